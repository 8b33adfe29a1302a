//! Renderer collaborators that receive one frame per iteration.
//!
//! The search engine hands every sink an immutable [`FrameSnapshot`] and
//! never reads anything back. A failing sink only costs frames; the school
//! itself is unaffected.
//!
//! # Sinks
//!
//! - [`NullSink`]: discards frames
//! - `Vec<FrameSnapshot>`: keeps frames in memory
//! - [`GnuplotSink`]: streams inline-data plot commands to gnuplot or a script file

mod gnuplot;

use std::io;

use crate::schema::FrameSnapshot;

pub use gnuplot::{GnuplotConfig, GnuplotSink};

/// Receives one frame per iteration.
pub trait FrameSink {
    /// Render a frame. Errors are reported to the engine and then ignored.
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError>;
}

/// Sink that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn render(&mut self, _frame: &FrameSnapshot) -> Result<(), RenderError> {
        Ok(())
    }
}

impl FrameSink for Vec<FrameSnapshot> {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        self.push(frame.clone());
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        (**self).render(frame)
    }
}

/// Renderer errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Render I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Could not start renderer process `{program}`: {source}")]
    ProcessUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FishSample;

    fn frame(iteration: usize) -> FrameSnapshot {
        FrameSnapshot {
            iteration,
            fish: vec![FishSample {
                x: 1.0,
                y: 2.0,
                weight: 1.5,
            }],
        }
    }

    #[test]
    fn test_null_sink_accepts() {
        assert!(NullSink.render(&frame(1)).is_ok());
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        frames.render(&frame(1)).unwrap();
        frames.render(&frame(2)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], frame(2));
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn FrameSink> = Box::new(Vec::<FrameSnapshot>::new());
        assert!(sink.render(&frame(1)).is_ok());
    }
}

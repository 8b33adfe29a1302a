//! Gnuplot renderer streaming inline-data point plots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::schema::FrameSnapshot;

use super::{FrameSink, RenderError};

/// Configuration for gnuplot output.
#[derive(Debug, Clone)]
pub struct GnuplotConfig {
    /// Render to this PNG file (pngcairo terminal) instead of the default terminal.
    pub png_output: Option<PathBuf>,
    /// Point size for every fish.
    pub point_size: f64,
    /// Pause after each frame, for watching the animation.
    pub frame_delay: Duration,
}

impl Default for GnuplotConfig {
    fn default() -> Self {
        Self {
            png_output: None,
            point_size: 1.5,
            frame_delay: Duration::ZERO,
        }
    }
}

/// Writes one `plot '-'` block per frame, coloring points by weight.
///
/// Usage:
/// ```ignore
/// let mut sink = GnuplotSink::spawn("gnuplot", GnuplotConfig::default())?;
/// let result = search.run_with_sink(&mut sink);
/// sink.finish()?;
/// ```
pub struct GnuplotSink<W: Write> {
    writer: W,
    config: GnuplotConfig,
    frames_written: u64,
    child: Option<Child>,
}

impl<W: Write> GnuplotSink<W> {
    /// Create a sink over any writer and emit the terminal preamble.
    pub fn new(writer: W, config: GnuplotConfig) -> Result<Self, RenderError> {
        let mut sink = Self {
            writer,
            config,
            frames_written: 0,
            child: None,
        };
        sink.write_preamble()?;
        Ok(sink)
    }

    fn write_preamble(&mut self) -> Result<(), RenderError> {
        if let Some(path) = &self.config.png_output {
            writeln!(self.writer, "set terminal pngcairo enhanced")?;
            writeln!(self.writer, "set output '{}'", path.display())?;
        }
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush the stream and wait for a spawned gnuplot to exit.
    ///
    /// Returns the number of frames written.
    pub fn finish(self) -> Result<u64, RenderError> {
        let Self {
            mut writer,
            frames_written,
            child,
            ..
        } = self;

        writer.flush()?;
        drop(writer);

        if let Some(mut child) = child {
            let status = child.wait()?;
            if !status.success() {
                log::warn!("gnuplot exited with {}", status);
            }
        }

        Ok(frames_written)
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl GnuplotSink<BufWriter<File>> {
    /// Write a replayable gnuplot script to `path`.
    pub fn to_file<P: AsRef<Path>>(path: P, config: GnuplotConfig) -> Result<Self, RenderError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), config)
    }
}

impl GnuplotSink<ChildStdin> {
    /// Start `program -persist` and stream frames into its stdin.
    pub fn spawn(program: &str, config: GnuplotConfig) -> Result<Self, RenderError> {
        let unavailable = |source: std::io::Error| RenderError::ProcessUnavailable {
            program: program.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .arg("-persist")
            .stdin(Stdio::piped())
            .spawn()
            .map_err(unavailable)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            unavailable(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdin not captured",
            ))
        })?;

        log::info!("Streaming frames to {} (pid {})", program, child.id());

        let mut sink = Self::new(stdin, config)?;
        sink.child = Some(child);
        Ok(sink)
    }
}

impl<W: Write> FrameSink for GnuplotSink<W> {
    fn render(&mut self, frame: &FrameSnapshot) -> Result<(), RenderError> {
        writeln!(
            self.writer,
            "plot '-' with points pointtype 7 pointsize {} lc variable",
            self.config.point_size
        )?;
        for fish in &frame.fish {
            writeln!(self.writer, "{} {} {}", fish.x, fish.y, fish.weight)?;
        }
        writeln!(self.writer, "e")?;
        self.writer.flush()?;
        self.frames_written += 1;

        if !self.config.frame_delay.is_zero() {
            thread::sleep(self.config.frame_delay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FishSample;
    use std::fs;
    use tempfile::tempdir;

    fn test_frame() -> FrameSnapshot {
        FrameSnapshot {
            iteration: 1,
            fish: vec![
                FishSample {
                    x: 0.5,
                    y: -1.25,
                    weight: 1.0,
                },
                FishSample {
                    x: 3.0,
                    y: 4.0,
                    weight: 2.5,
                },
            ],
        }
    }

    #[test]
    fn test_frame_format() {
        let mut sink = GnuplotSink::new(Vec::new(), GnuplotConfig::default()).unwrap();
        sink.render(&test_frame()).unwrap();
        assert_eq!(sink.frames_written(), 1);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "plot '-' with points pointtype 7 pointsize 1.5 lc variable\n\
             0.5 -1.25 1\n\
             3 4 2.5\n\
             e\n"
        );
    }

    #[test]
    fn test_png_preamble() {
        let config = GnuplotConfig {
            png_output: Some(PathBuf::from("output.png")),
            ..Default::default()
        };
        let sink = GnuplotSink::new(Vec::new(), config).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "set terminal pngcairo enhanced\nset output 'output.png'\n"
        );
    }

    #[test]
    fn test_script_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("school.gp");

        let mut sink = GnuplotSink::to_file(&path, GnuplotConfig::default()).unwrap();
        for _ in 0..3 {
            sink.render(&test_frame()).unwrap();
        }
        assert_eq!(sink.finish().unwrap(), 3);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("plot '-'").count(), 3);
        assert_eq!(text.lines().filter(|l| *l == "e").count(), 3);
    }

    #[test]
    fn test_missing_program() {
        let result = GnuplotSink::spawn(
            "definitely-not-a-gnuplot-binary",
            GnuplotConfig::default(),
        );
        assert!(matches!(
            result,
            Err(RenderError::ProcessUnavailable { .. })
        ));
    }
}

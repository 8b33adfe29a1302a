//! Fish School Search - population-based stochastic optimization in 2D.
//!
//! A school of fish moves through a bounded rectangle to minimize a scalar
//! objective. Each fish random-walks and feeds (gains or loses weight with
//! the change in fitness), while nearby fish attract each other with a pull
//! weakened by the neighbor's weight.
//!
//! # Architecture
//!
//! - `schema`: Configuration, objective functions, and result types
//! - `compute`: Fish, school, and the optimization loop
//! - `render`: Frame sinks that receive one snapshot per iteration
//!
//! # Example
//!
//! ```rust,no_run
//! use fish_school::{FishSchoolSearch, SchoolConfig};
//!
//! let config = SchoolConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut search = FishSchoolSearch::new(config);
//! let result = search.run();
//!
//! println!(
//!     "Best fitness {:.6} at ({:.4}, {:.4})",
//!     result.best.fitness, result.best.position[0], result.best.position[1]
//! );
//! ```

pub mod compute;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::{Fish, FishSchoolSearch, School, SchoolRng, UniformSource};
pub use render::{FrameSink, GnuplotSink, NullSink};
pub use schema::{FrameSnapshot, Objective, SchoolConfig, SearchResult};

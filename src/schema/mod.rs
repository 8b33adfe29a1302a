//! Schema module - Configuration, objective, and result types for Fish School Search.

mod config;
mod objective;
mod search;

pub use config::*;
pub use objective::*;
pub use search::*;

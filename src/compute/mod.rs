//! Compute module - The Fish School Search optimization core.
//!
//! - `rng`: Owned uniform random sources
//! - `fish`: Individual movement and feeding
//! - `school`: Social attraction pass and generation update
//! - `search`: The optimization loop

mod fish;
mod rng;
mod school;
mod search;

pub use fish::*;
pub use rng::*;
pub use school::*;
pub use search::*;

//! Snapshot, progress, and result types for a search run.

use serde::{Deserialize, Serialize};

/// Render-facing view of one fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishSample {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

/// Immutable view of the school after one iteration.
///
/// Samples are in school order, which is stable across iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Iteration that produced this frame (1-based).
    pub iteration: usize,
    /// One `(x, y, weight)` sample per fish.
    pub fish: Vec<FishSample>,
}

impl FrameSnapshot {
    /// Number of fish in the frame.
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    /// Whether the frame has no fish.
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}

/// Best position evaluated so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestSolution {
    /// Position of the best evaluation.
    pub position: [f64; 2],
    /// Objective value at `position`.
    pub fitness: f64,
    /// Iteration the position was evaluated in (0 = initialization).
    pub iteration: usize,
}

impl Default for BestSolution {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            fitness: f64::INFINITY,
            iteration: 0,
        }
    }
}

/// Per-iteration statistics for plotting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHistory {
    /// Lowest fitness in the school per iteration.
    pub best_fitness: Vec<f64>,
    /// Mean fitness per iteration.
    pub avg_fitness: Vec<f64>,
    /// Mean weight per iteration.
    pub avg_weight: Vec<f64>,
}

/// Current phase of the search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// School not yet created.
    #[default]
    Initializing,
    /// Generations in progress.
    Running,
    /// All iterations done.
    Complete,
}

/// Progress report emitted after every iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Iterations completed.
    pub iteration: usize,
    /// Total iterations planned.
    pub total_iterations: usize,
    /// Best solution seen so far.
    pub best: BestSolution,
    /// Lowest fitness in the current school.
    pub iteration_best: f64,
    /// Mean fitness of the current school.
    pub avg_fitness: f64,
    /// Mean weight of the current school.
    pub avg_weight: f64,
    pub phase: SearchPhase,
}

/// Final result of a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best position evaluated during the run.
    pub best: BestSolution,
    /// Statistics from the run.
    pub stats: SearchStats,
    /// Full history for analysis.
    pub history: SearchHistory,
}

/// Statistics from a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations run.
    pub iterations: usize,
    /// Objective evaluations performed, initialization included.
    pub total_evaluations: u64,
    /// Average fitness of the final school.
    pub final_avg_fitness: f64,
    /// Frames the renderer rejected.
    pub render_failures: u64,
    /// Seed of the random source, when known.
    pub random_seed: Option<u64>,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Iterations per second.
    pub iterations_per_second: f64,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} iterations, {} evaluations in {:.2}s ({:.1} it/s), final avg fitness {:.6}",
            self.iterations,
            self.total_evaluations,
            self.elapsed_seconds,
            self.iterations_per_second,
            self.final_avg_fitness
        )
    }
}

//! The optimization loop driving a school through a fixed number of iterations.

use std::time::Instant;

use crate::render::{FrameSink, NullSink};
use crate::schema::{
    BestSolution, SchoolConfig, SearchHistory, SearchPhase, SearchProgress, SearchResult,
    SearchStats,
};

use super::rng::{SchoolRng, UniformSource};
use super::school::School;

/// Fish School Search engine.
///
/// Owns the configuration, the random source and the school. A run is
/// `initialize` followed by exactly `population.iterations` calls to
/// `step`, with one frame emitted to the sink after each.
pub struct FishSchoolSearch<R: UniformSource = SchoolRng> {
    config: SchoolConfig,
    rng: R,
    random_seed: Option<u64>,
    initial_school: Option<School>,
    school: Option<School>,
    iteration: usize,
    best: BestSolution,
    history: SearchHistory,
    evaluations: u64,
    render_failures: u64,
}

impl FishSchoolSearch<SchoolRng> {
    /// Create an engine with a seeded generator.
    ///
    /// Uses `config.random_seed` when set, otherwise a freshly drawn seed.
    pub fn new(config: SchoolConfig) -> Self {
        let rng = config
            .random_seed
            .map(SchoolRng::new)
            .unwrap_or_else(SchoolRng::random);
        let seed = rng.seed();

        let mut engine = Self::with_source(config, rng);
        engine.random_seed = Some(seed);
        engine
    }
}

impl<R: UniformSource> FishSchoolSearch<R> {
    /// Create an engine drawing from an explicit random source.
    pub fn with_source(config: SchoolConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            random_seed: None,
            initial_school: None,
            school: None,
            iteration: 0,
            best: BestSolution::default(),
            history: SearchHistory::default(),
            evaluations: 0,
            render_failures: 0,
        }
    }

    /// Start every run from this school instead of drawing one.
    pub fn with_school(mut self, school: School) -> Self {
        self.initial_school = Some(school);
        self
    }

    pub fn config(&self) -> &SchoolConfig {
        &self.config
    }

    /// Current school, `None` before initialization.
    pub fn school(&self) -> Option<&School> {
        self.school.as_ref()
    }

    /// Iterations completed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Best solution seen so far.
    pub fn best(&self) -> BestSolution {
        self.best
    }

    /// Create the school and reset all run bookkeeping.
    pub fn initialize(&mut self) {
        let school = match &self.initial_school {
            Some(school) => school.clone(),
            None => School::random(&self.config, &mut self.rng),
        };

        self.iteration = 0;
        self.history = SearchHistory::default();
        self.best = BestSolution::default();
        self.render_failures = 0;
        self.evaluations = school.len() as u64;
        self.track_best(&school);

        log::info!(
            "Initialized school of {} fish on {} (seed: {})",
            school.len(),
            self.config.objective.name(),
            self.random_seed
                .map_or_else(|| "external".to_string(), |s| s.to_string())
        );

        self.school = Some(school);
    }

    /// Advance the school by one generation.
    pub fn step(&mut self) {
        if self.school.is_none() {
            self.initialize();
        }
        let Some(mut school) = self.school.take() else {
            return;
        };

        school.update(&self.config, &mut self.rng);
        self.iteration += 1;
        self.evaluations += school.len() as u64;

        self.track_best(&school);
        let iteration_best = school.best().map_or(f64::INFINITY, |f| f.last_fitness);
        let avg_fitness = school.avg_fitness();
        let avg_weight = school.avg_weight();

        self.history.best_fitness.push(iteration_best);
        self.history.avg_fitness.push(avg_fitness);
        self.history.avg_weight.push(avg_weight);

        log::debug!(
            "Iteration {}: best={:.6}, avg={:.6}, avg_weight={:.4}",
            self.iteration,
            iteration_best,
            avg_fitness,
            avg_weight
        );

        self.school = Some(school);
    }

    fn track_best(&mut self, school: &School) {
        if let Some(fish) = school.best()
            && fish.last_fitness < self.best.fitness
        {
            self.best = BestSolution {
                position: fish.position,
                fitness: fish.last_fitness,
                iteration: self.iteration,
            };
        }
    }

    /// Get current progress.
    pub fn progress(&self) -> SearchProgress {
        let total_iterations = self.config.population.iterations;
        let (iteration_best, avg_fitness, avg_weight) = match &self.school {
            Some(school) => (
                school.best().map_or(f64::INFINITY, |f| f.last_fitness),
                school.avg_fitness(),
                school.avg_weight(),
            ),
            None => (f64::INFINITY, 0.0, 0.0),
        };

        let phase = if self.school.is_none() {
            SearchPhase::Initializing
        } else if self.iteration >= total_iterations {
            SearchPhase::Complete
        } else {
            SearchPhase::Running
        };

        SearchProgress {
            iteration: self.iteration,
            total_iterations,
            best: self.best,
            iteration_best,
            avg_fitness,
            avg_weight,
            phase,
        }
    }

    /// Hand the current frame to the sink; failures are counted and logged.
    fn emit_frame(&mut self, sink: &mut dyn FrameSink) {
        let Some(school) = &self.school else {
            return;
        };
        let frame = school.snapshot(self.iteration);

        if let Err(e) = sink.render(&frame) {
            self.render_failures += 1;
            if self.render_failures == 1 {
                log::warn!("Renderer failed at iteration {}: {}", self.iteration, e);
            } else {
                log::debug!("Renderer failed at iteration {}: {}", self.iteration, e);
            }
        }
    }

    /// Run all iterations, emitting frames and reporting progress.
    pub fn run_with_callback<F>(&mut self, sink: &mut dyn FrameSink, callback: F) -> SearchResult
    where
        F: Fn(&SearchProgress),
    {
        let start_time = Instant::now();
        let iterations = self.config.population.iterations;

        self.initialize();

        for _ in 0..iterations {
            self.step();
            self.emit_frame(sink);
            callback(&self.progress());
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let final_avg_fitness = self.school.as_ref().map_or(0.0, School::avg_fitness);

        if self.render_failures > 0 {
            log::warn!(
                "Renderer rejected {} of {} frames",
                self.render_failures,
                iterations
            );
        }
        log::info!(
            "Finished {} iterations: best fitness {:.6} at ({:.6}, {:.6})",
            self.iteration,
            self.best.fitness,
            self.best.position[0],
            self.best.position[1]
        );

        SearchResult {
            best: self.best,
            stats: SearchStats {
                iterations: self.iteration,
                total_evaluations: self.evaluations,
                final_avg_fitness,
                render_failures: self.render_failures,
                random_seed: self.random_seed,
                elapsed_seconds: elapsed,
                iterations_per_second: self.iteration as f64 / elapsed.max(1e-9),
            },
            history: self.history.clone(),
        }
    }

    /// Run all iterations, emitting one frame per iteration to `sink`.
    pub fn run_with_sink(&mut self, sink: &mut dyn FrameSink) -> SearchResult {
        self.run_with_callback(sink, |_| {})
    }

    /// Run without a renderer (blocking).
    pub fn run(&mut self) -> SearchResult {
        self.run_with_sink(&mut NullSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::fish::Fish;
    use crate::compute::rng::ConstantSource;
    use crate::render::RenderError;
    use crate::schema::{FrameSnapshot, Objective, PopulationConfig};
    use std::cell::Cell;

    fn small_config(size: usize, iterations: usize) -> SchoolConfig {
        SchoolConfig {
            population: PopulationConfig { size, iterations },
            random_seed: Some(42),
            ..Default::default()
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn render(&mut self, _frame: &FrameSnapshot) -> Result<(), RenderError> {
            Err(RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "renderer gone",
            )))
        }
    }

    #[test]
    fn test_engine_creation() {
        let mut engine = FishSchoolSearch::new(small_config(10, 5));
        assert!(engine.school().is_none());
        assert_eq!(engine.progress().phase, SearchPhase::Initializing);

        engine.initialize();
        assert_eq!(engine.school().map(School::len), Some(10));
        assert_eq!(engine.progress().phase, SearchPhase::Running);
    }

    #[test]
    fn test_run_exact_iterations() {
        let mut engine = FishSchoolSearch::new(small_config(20, 25));
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        let result = engine.run_with_sink(&mut frames);

        assert_eq!(result.stats.iterations, 25);
        assert_eq!(result.stats.total_evaluations, 20 * 26);
        assert_eq!(result.stats.random_seed, Some(42));
        assert_eq!(frames.len(), 25);
        assert_eq!(result.history.avg_fitness.len(), 25);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.iteration, i + 1);
            assert_eq!(frame.len(), 20);
        }
        assert_eq!(engine.progress().phase, SearchPhase::Complete);
    }

    #[test]
    fn test_weight_floor_every_frame() {
        let config = small_config(50, 100);
        let floor = config.feeding.weight_floor;
        let mut engine = FishSchoolSearch::new(config);
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        engine.run_with_sink(&mut frames);

        for frame in &frames {
            assert!(frame.fish.iter().all(|f| f.weight >= floor));
        }
    }

    #[test]
    fn test_same_seed_reproducible() {
        let mut a = FishSchoolSearch::new(small_config(15, 30));
        let mut b = FishSchoolSearch::new(small_config(15, 30));
        let mut frames_a: Vec<FrameSnapshot> = Vec::new();
        let mut frames_b: Vec<FrameSnapshot> = Vec::new();

        let result_a = a.run_with_sink(&mut frames_a);
        let result_b = b.run_with_sink(&mut frames_b);

        assert_eq!(frames_a, frames_b);
        assert_eq!(result_a.best, result_b.best);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let sequential_config = small_config(40, 20);
        let parallel_config = SchoolConfig {
            parallel: true,
            ..sequential_config.clone()
        };

        let mut frames_seq: Vec<FrameSnapshot> = Vec::new();
        let mut frames_par: Vec<FrameSnapshot> = Vec::new();
        FishSchoolSearch::new(sequential_config).run_with_sink(&mut frames_seq);
        FishSchoolSearch::new(parallel_config).run_with_sink(&mut frames_par);

        assert_eq!(frames_seq, frames_par);
    }

    #[test]
    fn test_failing_renderer_does_not_disturb_school() {
        let mut with_failures = FishSchoolSearch::new(small_config(10, 12));
        let mut without_renderer = FishSchoolSearch::new(small_config(10, 12));

        let result = with_failures.run_with_sink(&mut FailingSink);
        without_renderer.run();

        assert_eq!(result.stats.render_failures, 12);
        assert_eq!(result.stats.iterations, 12);
        assert_eq!(with_failures.school(), without_renderer.school());
    }

    #[test]
    fn test_callback_per_iteration() {
        let calls = Cell::new(0usize);
        let mut engine = FishSchoolSearch::new(small_config(5, 7));
        engine.run_with_callback(&mut NullSink, |progress| {
            calls.set(calls.get() + 1);
            assert_eq!(progress.iteration, calls.get());
            assert_eq!(progress.total_iterations, 7);
        });
        assert_eq!(calls.get(), 7);
    }

    #[test]
    fn test_best_never_worsens() {
        let mut engine = FishSchoolSearch::new(small_config(30, 0));
        engine.initialize();
        let mut previous = engine.best().fitness;
        for _ in 0..50 {
            engine.step();
            let best = engine.best();
            assert!(best.fitness <= previous);
            assert_eq!(config_objective(&engine).at(best.position), best.fitness);
            previous = best.fitness;
        }
    }

    fn config_objective<R: UniformSource>(engine: &FishSchoolSearch<R>) -> Objective {
        engine.config().objective
    }

    #[test]
    fn test_zero_iterations() {
        let mut engine = FishSchoolSearch::new(small_config(8, 0));
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        let result = engine.run_with_sink(&mut frames);

        assert!(frames.is_empty());
        assert_eq!(result.stats.iterations, 0);
        assert_eq!(result.stats.total_evaluations, 8);
        assert!(result.best.fitness.is_finite());
    }

    #[test]
    fn test_single_fish_three_iterations_by_hand() {
        let config = SchoolConfig {
            population: PopulationConfig {
                size: 1,
                iterations: 3,
            },
            ..Default::default()
        };
        let objective = Objective::Rosenbrock;
        let start = Fish::new([0.0, 0.0], [0.5, 0.25], 0.5, objective);

        let mut engine = FishSchoolSearch::with_source(config, ConstantSource(0.0))
            .with_school(School::new(vec![start]));
        let mut frames: Vec<FrameSnapshot> = Vec::new();
        let result = engine.run_with_sink(&mut frames);

        // x_{n+1} = x_n + v_n, v_{n+1} = 0.95 v_n
        let expected = [(0.5, 0.25), (0.975, 0.4875), (1.42625, 0.713125)];
        assert_eq!(frames.len(), 3);
        for (frame, (x, y)) in frames.iter().zip(expected) {
            assert!((frame.fish[0].x - x).abs() < 1e-12);
            assert!((frame.fish[0].y - y).abs() < 1e-12);
        }

        // Weight: max(1, w + 0.01 (f_n - f_{n-1}))
        let f0 = objective.evaluate(0.0, 0.0);
        let mut weight: f64 = 0.5;
        let mut last = f0;
        for (frame, (x, y)) in frames.iter().zip(expected) {
            let f = objective.evaluate(x, y);
            weight = (weight + 0.01 * (f - last)).max(1.0);
            last = f;
            assert!((frame.fish[0].weight - weight).abs() < 1e-9);
        }

        let fish = engine.school().map(|s| s.fish()[0]);
        let velocity = fish.map(|f| f.velocity).unwrap_or_default();
        assert!((velocity[0] - 0.4286875).abs() < 1e-12);
        assert!((velocity[1] - 0.21434375).abs() < 1e-12);

        // f(0.5, 0.25) = 0.25 is the lowest value visited
        assert_eq!(result.best.iteration, 1);
        assert!((result.best.fitness - 0.25).abs() < 1e-12);
    }
}

//! Compare objectives and population sizes on a fixed seed.

use fish_school::{
    FishSchoolSearch,
    schema::{Objective, PopulationConfig, SchoolConfig},
};
use std::time::Instant;

fn main() {
    println!("=== Fish School Search Benchmarks ===\n");

    for objective in [
        Objective::Rosenbrock,
        Objective::Sphere,
        Objective::Rastrigin,
        Objective::Himmelblau,
    ] {
        let config = SchoolConfig {
            population: PopulationConfig {
                size: 100,
                iterations: 500,
            },
            objective,
            random_seed: Some(42),
            ..Default::default()
        };

        let mut search = FishSchoolSearch::new(config);
        let result = search.run();
        let target = objective.minimum();

        println!("{}:", objective.name());
        println!("  Best fitness:   {:.6}", result.best.fitness);
        println!(
            "  Best position:  ({:.4}, {:.4}), known minimum ({}, {})",
            result.best.position[0], result.best.position[1], target[0], target[1]
        );
        println!("  Found at:       iteration {}", result.best.iteration);
        println!("  Stats:          {}", result.stats);
        println!();
    }

    println!("=== Scalability Test (Rosenbrock, 200 iterations) ===\n");

    for size in [10, 50, 100, 200] {
        for parallel in [false, true] {
            let config = SchoolConfig {
                population: PopulationConfig {
                    size,
                    iterations: 200,
                },
                random_seed: Some(42),
                parallel,
                ..Default::default()
            };

            let start = Instant::now();
            let result = FishSchoolSearch::new(config).run();
            let elapsed = start.elapsed();

            println!(
                "Population {:>3} ({}): best {:.6} in {:.3}s",
                size,
                if parallel { "parallel" } else { "sequential" },
                result.best.fitness,
                elapsed.as_secs_f64()
            );
        }
    }
}

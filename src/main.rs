//! Fish School Search CLI - Run an optimization from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use fish_school::{
    FishSchoolSearch,
    render::{FrameSink, GnuplotConfig, GnuplotSink, NullSink},
    schema::SchoolConfig,
};

/// Parsed command-line options.
#[derive(Default)]
struct Options {
    config_path: Option<PathBuf>,
    plot: bool,
    script: Option<PathBuf>,
    png: Option<PathBuf>,
    delay_ms: u64,
    iterations: Option<usize>,
    seed: Option<u64>,
    parallel: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [options]", program);
    eprintln!();
    eprintln!("Run Fish School Search on a 2D objective function.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json        Path to configuration file (default: built-in defaults)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --plot             Stream frames to a `gnuplot -persist` process");
    eprintln!("  --script <file>    Write frames as a gnuplot script");
    eprintln!("  --png <file>       Render through the pngcairo terminal into <file>");
    eprintln!("  --delay-ms <n>     Pause after each frame (default: 0)");
    eprintln!("  --iterations <n>   Override population.iterations");
    eprintln!("  --seed <n>         Override random_seed");
    eprintln!("  --parallel         Compute the social pass on all cores");
    eprintln!("  --example          Print the default configuration and exit");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_else(|| {
        eprintln!("Error: {} expects a value", flag);
        std::process::exit(1);
    })
}

fn parse_args(program: &str, args: impl Iterator<Item = String>) -> Options {
    let mut options = Options::default();
    let mut args = args;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--example" => {
                print_example_config();
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_usage(program);
                std::process::exit(0);
            }
            "--plot" => options.plot = true,
            "--parallel" => options.parallel = true,
            "--script" => options.script = Some(parse_value(&arg, args.next())),
            "--png" => options.png = Some(parse_value(&arg, args.next())),
            "--delay-ms" => options.delay_ms = parse_value(&arg, args.next()),
            "--iterations" => options.iterations = Some(parse_value(&arg, args.next())),
            "--seed" => options.seed = Some(parse_value(&arg, args.next())),
            other if other.starts_with("--") => {
                eprintln!("Unknown option: {}", other);
                print_usage(program);
                std::process::exit(1);
            }
            path => options.config_path = Some(PathBuf::from(path)),
        }
    }

    options
}

fn load_config(options: &Options) -> SchoolConfig {
    let mut config = match &options.config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => SchoolConfig::default(),
    };

    if let Some(iterations) = options.iterations {
        config.population.iterations = iterations;
    }
    if options.seed.is_some() {
        config.random_seed = options.seed;
    }
    if options.parallel {
        config.parallel = true;
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    config
}

fn open_sink(options: &Options) -> Box<dyn FrameSink> {
    let gnuplot_config = GnuplotConfig {
        png_output: options.png.clone(),
        frame_delay: Duration::from_millis(options.delay_ms),
        ..Default::default()
    };

    if let Some(path) = &options.script {
        match GnuplotSink::to_file(path, gnuplot_config) {
            Ok(sink) => return Box::new(sink),
            Err(e) => {
                eprintln!("Error creating script file: {}", e);
                std::process::exit(1);
            }
        }
    }

    if options.plot || options.png.is_some() {
        match GnuplotSink::spawn("gnuplot", gnuplot_config) {
            Ok(sink) => return Box::new(sink),
            // The search runs the same without a renderer.
            Err(e) => eprintln!("Warning: {}; continuing without plotting", e),
        }
    }

    Box::new(NullSink)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "fish-school".to_string());
    let options = parse_args(&program, args);
    let config = load_config(&options);

    println!("Fish School Search");
    println!("==================");
    println!("Objective: {}", config.objective.name());
    println!("Fish: {}", config.population.size);
    println!("Iterations: {}", config.population.iterations);
    println!(
        "Bounds: [{}, {}]^2",
        config.bounds.position.0, config.bounds.position.1
    );
    println!();

    let iterations = config.population.iterations;
    let mut sink = open_sink(&options);
    let mut search = FishSchoolSearch::new(config);

    println!("Running search...");
    let result = search.run_with_callback(sink.as_mut(), |progress| {
        // Print progress every 10%
        if progress.iteration % (iterations / 10).max(1) == 0 {
            println!(
                "  Iteration {}/{}: best={:.6}, avg={:.6}, avg_weight={:.4}",
                progress.iteration,
                progress.total_iterations,
                progress.best.fitness,
                progress.avg_fitness,
                progress.avg_weight
            );
        }
    });

    // Dropping the sink closes the gnuplot pipe.
    drop(sink);

    println!();
    println!("Best solution:");
    println!(
        "  Position: ({:.6}, {:.6})",
        result.best.position[0], result.best.position[1]
    );
    println!("  Fitness: {:.6}", result.best.fitness);
    println!("  Found at iteration: {}", result.best.iteration);
    if let Some(seed) = result.stats.random_seed {
        println!("  Seed: {}", seed);
    }
    println!();
    println!("{}", result.stats);
}

fn print_example_config() {
    let config = SchoolConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}

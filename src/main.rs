//! FAP Tabu Solver - Command Line Interface
//!
//! Frequency assignment for cellular networks with tabu search.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fap_tabu::benchmark::{Benchmark, BenchmarkConfig};
use fap_tabu::error::{FapError, Result};
use fap_tabu::heuristics::construction::{
    ConstructionHeuristic, ConstructionKind, FirstFitConstruction, RandomFeasibleConstruction,
};
use fap_tabu::heuristics::tabu_search::{SearchConfig, SearchStrategy, TabuSearch};
use fap_tabu::instance::Problem;
use fap_tabu::report::{write_reports, SolutionReport};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fap-tabu")]
#[command(version = "1.0")]
#[command(about = "Tabu search solver for the Frequency Assignment Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a scenario and write the run log and solution report
    Solve {
        /// Path to the .scen file
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        search: SearchArgs,

        /// Directory for the log and solution files
        #[arg(short, long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write a JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the search over several seeds and summarise
    Benchmark {
        /// Path to the .scen file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        base_seed: u64,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run seeds one after another
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Analyze a scenario
    Analyze {
        /// Path to the .scen file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

/// Search parameters; flags override values from `--config`
#[derive(Args, Debug)]
struct SearchArgs {
    /// JSON file with a search configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Tabu tenure
    #[arg(long)]
    tenure: Option<usize>,

    /// Candidate list size
    #[arg(long)]
    candidates: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Move selection strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Keep searching after reaching cost 0
    #[arg(long)]
    keep_going: bool,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Evaluate candidates in parallel
    #[arg(long)]
    parallel: bool,

    /// Initial solution heuristic
    #[arg(long, value_enum)]
    init: Option<Init>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Strategy {
    /// Best move of a random candidate list
    CandidateList,
    /// First improving move of the full neighbourhood
    FirstImprovement,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Init {
    /// Random feasible frequencies
    Random,
    /// Lowest feasible frequencies
    FirstFit,
}

impl SearchArgs {
    fn to_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                serde_json::from_reader(file)?
            }
            None => SearchConfig::default(),
        };

        if let Some(n) = self.max_iterations {
            config.max_iterations = n;
        }
        if let Some(t) = self.tenure {
            config.tabu_tenure = t;
        }
        if let Some(c) = self.candidates {
            config.candidate_list_size = c;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = match strategy {
                Strategy::CandidateList => SearchStrategy::CandidateList,
                Strategy::FirstImprovement => SearchStrategy::FirstImprovement,
            };
        }
        if self.keep_going {
            config.stop_at_optimum = false;
        }
        if let Some(limit) = self.time_limit {
            config.time_limit = Some(limit);
        }
        if self.parallel {
            config.parallel = true;
        }
        if let Some(init) = self.init {
            config.construction = match init {
                Init::Random => ConstructionKind::Random,
                Init::FirstFit => ConstructionKind::FirstFit,
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { instance, search, output_dir, json, verbose } => {
            solve_instance(&instance, &search, &output_dir, json.as_deref(), verbose)
        }

        Commands::Benchmark { instance, runs, base_seed, output, sequential, search } => {
            run_benchmark(&instance, runs, base_seed, output.as_deref(), !sequential, &search)
        }

        Commands::Analyze { instance } => analyze_instance(&instance),
    };

    if let Err(e) = outcome {
        match &e {
            FapError::InsufficientDomain { .. } => eprintln!("Unsatisfiable problem: {}", e),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn load(path: &Path) -> Result<Problem> {
    println!("Loading scenario from {:?}...", path);
    Problem::from_file(path)
}

fn solve_instance(
    path: &Path,
    args: &SearchArgs,
    output_dir: &Path,
    json: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config = args.to_config()?;
    let problem = load(path)?;

    if verbose {
        println!("{}", problem.statistics());
        println!("Configuration: {:?}", config);
    }

    println!(
        "Solving {} ({} cells, {} TRXs) with seed {}...",
        problem.name,
        problem.num_cells(),
        problem.total_demand(),
        config.seed
    );

    let result = TabuSearch::new(&problem, config.clone())?.run()?;

    println!("\n========== Result ==========");
    println!("Initial cost: {:.2}", result.initial_cost);
    println!("Final cost:   {:.2}", result.best_cost);
    println!(
        "Iterations:   {} (best found at {})",
        result.iterations, result.best_iteration
    );
    println!("Stopped:      {}", result.termination);
    println!("Time:         {:.3}s", result.elapsed.as_secs_f64());
    if result.feasible {
        println!("Feasible:     yes");
    } else {
        println!("Feasible:     no ({} co-site violations)", result.violations);
    }

    if verbose {
        println!("\n{}", result.best);
    }

    let files = write_reports(output_dir, &problem, &config, &result)?;
    println!("\nLog saved to {:?}", files.log);
    println!("Solution saved to {:?}", files.solution);

    if let Some(json_path) = json {
        SolutionReport::new(&problem, &config, &result).save_json(json_path)?;
        println!("JSON report saved to {:?}", json_path);
    }

    Ok(())
}

fn run_benchmark(
    path: &Path,
    runs: usize,
    base_seed: u64,
    output: Option<&Path>,
    parallel: bool,
    args: &SearchArgs,
) -> Result<()> {
    let search = args.to_config()?;
    let problem = load(path)?;

    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed,
        search,
        parallel,
    };

    let pb = ProgressBar::new(runs as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} runs ({elapsed}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut benchmark = Benchmark::new(config);
    let run = benchmark.run(&problem, |r| {
        pb.set_message(format!("seed {} -> {:.2}", r.seed, r.cost));
        pb.inc(1);
    });
    pb.finish_and_clear();
    run?;

    println!("\n{}", benchmark.generate_report());

    if let Some(out_path) = output {
        benchmark.export_to_csv(out_path)?;
        println!("Results exported to {:?}", out_path);
    }

    Ok(())
}

fn analyze_instance(path: &Path) -> Result<()> {
    let problem = load(path)?;

    println!("========== Scenario Analysis ==========\n");
    println!("{}", problem.statistics());

    let mut sizes: Vec<usize> = (0..problem.num_cells())
        .map(|c| problem.domain(c).len())
        .collect();
    sizes.sort_unstable();
    if let (Some(min), Some(max)) = (sizes.first(), sizes.last()) {
        let avg = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        println!("\nDomain sizes:");
        println!("  Min: {}", min);
        println!("  Max: {}", max);
        println!("  Average: {:.2}", avg);
    }

    let co_sited = (0..problem.num_cells())
        .filter(|&c| !problem.co_sited(c).is_empty())
        .count();
    println!("  Cells sharing a site: {}", co_sited);

    problem.check_domains()?;

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let first_fit = FirstFitConstruction.construct(&problem, &mut rng)?;
    let random = RandomFeasibleConstruction.construct(&problem, &mut rng)?;

    println!("\nQuick Solution Estimates:");
    println!(
        "  {}: {:.2} (feasible: {})",
        FirstFitConstruction.name(),
        first_fit.cost,
        problem.is_feasible(&first_fit)
    );
    println!(
        "  {}: {:.2} (feasible: {})",
        RandomFeasibleConstruction.name(),
        random.cost,
        problem.is_feasible(&random)
    );

    Ok(())
}

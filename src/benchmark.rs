//! Multi-seed benchmarking of the tabu search.
//!
//! Runs the same configuration over a range of seeds, collects one record
//! per run and summarises them.

use crate::error::Result;
use crate::heuristics::tabu_search::{solve, SearchConfig, TerminationReason};
use crate::instance::Problem;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    pub seed: u64,
    /// Best cost found
    pub cost: f64,
    pub initial_cost: f64,
    /// Whether the best solution respects the co-site separation
    pub feasible: bool,
    pub iterations: usize,
    pub best_iteration: usize,
    pub termination: TerminationReason,
    /// Computation time in seconds
    pub time: f64,
}

/// Summary over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub num_runs: usize,
    pub num_feasible: usize,
    /// Runs that reached cost 0
    pub optimum_hits: usize,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub avg_cost: f64,
    /// Sample standard deviation of the cost (0 for a single run)
    pub std_cost: f64,
    pub avg_time: f64,
    pub total_time: f64,
    pub avg_iterations: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs
    pub num_runs: usize,
    /// Seed of the first run; run `k` uses `base_seed + k`
    pub base_seed: u64,
    /// Search settings shared by every run (its seed is overridden)
    pub search: SearchConfig,
    /// Run seeds in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 10,
            base_seed: 0,
            search: SearchConfig::default(),
            parallel: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run every seed on `problem`; `on_run` is called after each run, from
    /// whichever thread finished it. Results are kept in seed order.
    pub fn run<F>(&mut self, problem: &Problem, on_run: F) -> Result<&[RunResult]>
    where
        F: Fn(&RunResult) + Sync,
    {
        log::info!(
            "Benchmarking {} over {} seeds starting at {}",
            problem.name,
            self.config.num_runs,
            self.config.base_seed
        );

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|k| self.config.base_seed + k)
            .collect();
        let search = &self.config.search;

        let run_one = |seed: u64| -> Result<RunResult> {
            let result = solve(problem, search.clone().with_seed(seed))?;
            let run = RunResult {
                instance: problem.name.clone(),
                seed,
                cost: result.best_cost,
                initial_cost: result.initial_cost,
                feasible: result.feasible,
                iterations: result.iterations,
                best_iteration: result.best_iteration,
                termination: result.termination,
                time: result.elapsed.as_secs_f64(),
            };
            on_run(&run);
            Ok(run)
        };

        let runs: Result<Vec<RunResult>> = if self.config.parallel {
            seeds.par_iter().map(|&seed| run_one(seed)).collect()
        } else {
            seeds.iter().map(|&seed| run_one(seed)).collect()
        };
        self.results.extend(runs?);

        Ok(&self.results)
    }

    /// Summary statistics, or `None` before any run
    pub fn statistics(&self) -> Option<BenchmarkStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let costs: Vec<f64> = self.results.iter().map(|r| r.cost).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();
        let iterations: Vec<f64> = self.results.iter().map(|r| r.iterations as f64).collect();

        let std_cost = if costs.len() > 1 {
            Statistics::std_dev(&costs)
        } else {
            0.0
        };

        Some(BenchmarkStatistics {
            num_runs: self.results.len(),
            num_feasible: self.results.iter().filter(|r| r.feasible).count(),
            optimum_hits: self.results.iter().filter(|r| r.cost == 0.0).count(),
            best_cost: Statistics::min(&costs),
            worst_cost: Statistics::max(&costs),
            avg_cost: Statistics::mean(&costs),
            std_cost,
            avg_time: Statistics::mean(&times),
            total_time: times.iter().sum(),
            avg_iterations: Statistics::mean(&iterations),
        })
    }

    /// Export per-run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        FAP Tabu Benchmark Report\n");
        report.push_str("========================================\n\n");

        let Some(stats) = self.statistics() else {
            report.push_str("No runs recorded.\n");
            return report;
        };

        report.push_str(&format!(
            "Runs: {}  Feasible: {}  Optimum hits: {}\n\n",
            stats.num_runs, stats.num_feasible, stats.optimum_hits
        ));

        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:>8} {:>12} {:>12} {:>10} {:>10} {:>14}\n",
            "Seed", "Initial", "Best", "Feasible", "Iters", "Time (s)"
        ));
        report.push_str("-".repeat(72).as_str());
        report.push('\n');

        for r in &self.results {
            report.push_str(&format!(
                "{:>8} {:>12.2} {:>12.2} {:>10} {:>10} {:>14.4}\n",
                r.seed, r.initial_cost, r.cost, r.feasible, r.iterations, r.time
            ));
        }

        report.push_str("-".repeat(72).as_str());
        report.push('\n');
        report.push_str(&format!(
            "Cost: best {:.2}  worst {:.2}  mean {:.2}  std {:.2}\n",
            stats.best_cost, stats.worst_cost, stats.avg_cost, stats.std_cost
        ));
        report.push_str(&format!(
            "Time: mean {:.4}s  total {:.4}s  mean iterations {:.1}\n",
            stats.avg_time, stats.total_time, stats.avg_iterations
        ));

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

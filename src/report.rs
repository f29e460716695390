//! Run log and solution report files.

use crate::error::Result;
use crate::heuristics::tabu_search::{SearchConfig, SearchResult, TerminationReason};
use crate::instance::{CellId, Frequency, Problem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Machine-readable summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionReport {
    pub instance: String,
    pub cost: f64,
    pub initial_cost: f64,
    pub feasible: bool,
    pub violations: usize,
    pub iterations: usize,
    pub best_iteration: usize,
    pub termination: TerminationReason,
    pub elapsed_seconds: f64,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub config: SearchConfig,
    pub assignment: BTreeMap<CellId, Vec<Frequency>>,
}

impl SolutionReport {
    pub fn new(problem: &Problem, config: &SearchConfig, result: &SearchResult) -> Self {
        SolutionReport {
            instance: problem.name.clone(),
            cost: result.best_cost,
            initial_cost: result.initial_cost,
            feasible: result.feasible,
            violations: result.violations,
            iterations: result.iterations,
            best_iteration: result.best_iteration,
            termination: result.termination,
            elapsed_seconds: result.elapsed.as_secs_f64(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
            assignment: result.best.by_cell_id(problem),
        }
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Paths of the text files written for one run
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub log: PathBuf,
    pub solution: PathBuf,
}

/// Write `<name>_log.txt` and `<name>_solution.txt` into `dir`
pub fn write_reports<P: AsRef<Path>>(
    dir: P,
    problem: &Problem,
    config: &SearchConfig,
    result: &SearchResult,
) -> Result<ReportFiles> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let files = ReportFiles {
        log: dir.join(format!("{}_log.txt", problem.name)),
        solution: dir.join(format!("{}_solution.txt", problem.name)),
    };
    std::fs::write(&files.log, render_log(problem, config, result))?;
    std::fs::write(&files.solution, render_solution(problem, result))?;

    log::info!("Log written to {}", files.log.display());
    log::info!("Solution written to {}", files.solution.display());
    Ok(files)
}

/// Run log: instance summary, parameters, one line per accepted move and
/// the outcome
pub fn render_log(problem: &Problem, config: &SearchConfig, result: &SearchResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Instance: {}", problem.name);
    let _ = writeln!(out, "Cells: {}", problem.num_cells());
    let _ = writeln!(out, "TRXs: {}", problem.total_demand());
    let _ = writeln!(out, "Relations: {}", problem.resolved_weights().len());
    let _ = writeln!(out, "Spectrum: [{}, {}]", problem.fmin, problem.fmax);
    let _ = writeln!(out, "Co-site separation: {}", problem.co_site_separation);
    let _ = writeln!(out, "Max iterations: {}", config.max_iterations);
    let _ = writeln!(out, "Tabu tenure: {}", config.tabu_tenure);
    let _ = writeln!(out, "Candidate list size: {}", config.candidate_list_size);
    let _ = writeln!(out, "Strategy: {:?}", config.strategy);
    let _ = writeln!(out, "Seed: {}", config.seed);
    out.push('\n');

    let _ = writeln!(out, "Initial cost: {:.2}", result.initial_cost);
    out.push('\n');

    for record in &result.trace {
        let _ = writeln!(
            out,
            "Iter {}: current = {:.2}, best = {:.2}",
            record.iteration + 1,
            record.current_cost,
            record.best_cost
        );
    }

    let _ = writeln!(
        out,
        "Stopped after {} iterations: {}",
        result.iterations, result.termination
    );
    out.push('\n');

    let _ = writeln!(out, "Final cost: {:.2}", result.best_cost);
    let _ = writeln!(out, "Elapsed: {:.3} s", result.elapsed.as_secs_f64());
    if result.feasible {
        let _ = writeln!(out, "Feasible solution");
    } else {
        let _ = writeln!(
            out,
            "Infeasible solution ({} co-site violations)",
            result.violations
        );
    }

    out
}

/// Solution report with one `Cell TRX Frequency` row per transceiver,
/// TRXs numbered from 1
pub fn render_solution(problem: &Problem, result: &SearchResult) -> String {
    let mut out = String::new();

    out.push_str("=== FAP SOLUTION ===\n\n");
    let _ = writeln!(out, "Instance: {}", problem.name);
    let _ = writeln!(out, "Total cost: {:.2}", result.best_cost);
    let _ = writeln!(out, "Elapsed: {:.3} s", result.elapsed.as_secs_f64());
    let _ = writeln!(out, "Feasible: {}", if result.feasible { "YES" } else { "NO" });
    out.push('\n');

    out.push_str("Frequency assignment:\n");
    out.push_str("Cell\tTRX\tFrequency\n");
    out.push_str(&"-".repeat(26));
    out.push('\n');
    for (id, freqs) in result.best.by_cell_id(problem) {
        for (trx, f) in freqs.iter().enumerate() {
            let _ = writeln!(out, "{}\t{}\t{}", id, trx + 1, f);
        }
    }

    out
}

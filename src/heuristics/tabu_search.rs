//! Tabu search over single-slot reassignments.
//!
//! Each iteration samples a bounded candidate list of feasible moves, drops
//! the ones forbidden by the tabu memory and adopts the cheapest of the rest,
//! even when it is worse than the current solution. The best solution seen
//! is tracked separately and is the only thing that improves monotonically.
//!
//! A [`TabuSearch`] owns the random generator for the whole run, so a fixed
//! seed reproduces the exact sequence of accepted moves.

use crate::error::{FapError, Result};
use crate::heuristics::candidates::{neighborhood, CandidateGenerator};
use crate::heuristics::construction::ConstructionKind;
use crate::heuristics::tabu::TabuMemory;
use crate::instance::Problem;
use crate::solution::{Move, Solution};
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How the next move is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// Best non-tabu move among a random sample of the neighbourhood
    #[default]
    CandidateList,
    /// First non-tabu improving move of the full neighbourhood, scanned in
    /// order, or the best non-tabu move when nothing improves
    FirstImprovement,
}

/// Tabu search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Iteration budget
    pub max_iterations: usize,
    /// Iterations an abandoned frequency stays forbidden in its slot
    pub tabu_tenure: usize,
    /// Target size of the sampled candidate list
    pub candidate_list_size: usize,
    /// Random seed
    pub seed: u64,
    pub strategy: SearchStrategy,
    /// Stop as soon as an interference-free assignment is found
    pub stop_at_optimum: bool,
    /// Wall-clock limit in seconds (optional)
    pub time_limit: Option<f64>,
    /// Evaluate candidates on the rayon thread pool
    pub parallel: bool,
    /// Heuristic building the initial solution
    pub construction: ConstructionKind,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 10_000,
            tabu_tenure: 15,
            candidate_list_size: 200,
            seed: 42,
            strategy: SearchStrategy::CandidateList,
            stop_at_optimum: true,
            time_limit: None,
            parallel: false,
            construction: ConstructionKind::Random,
        }
    }
}

impl SearchConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_candidate_list_size(mut self, size: usize) -> Self {
        self.candidate_list_size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_stop_at_optimum(mut self, stop: bool) -> Self {
        self.stop_at_optimum = stop;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_construction(mut self, construction: ConstructionKind) -> Self {
        self.construction = construction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategy == SearchStrategy::CandidateList && self.candidate_list_size == 0 {
            return Err(FapError::InvalidConfig(
                "candidate list size must be positive".to_string(),
            ));
        }
        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(FapError::InvalidConfig(format!(
                    "time limit must be a positive number of seconds, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// Why a search stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    MaxIterations,
    NoAdmissibleNeighbor,
    OptimumReached,
    TimeLimit,
    Cancelled,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TerminationReason::MaxIterations => "iteration budget exhausted",
            TerminationReason::NoAdmissibleNeighbor => "no admissible neighbour",
            TerminationReason::OptimumReached => "interference-free assignment found",
            TerminationReason::TimeLimit => "time limit reached",
            TerminationReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Initializing,
    Iterating,
    Terminated(TerminationReason),
}

/// One accepted move
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub mv: Move,
    pub current_cost: f64,
    pub best_cost: f64,
}

/// Outcome of a finished search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub best: Solution,
    pub best_cost: f64,
    /// Whether the best solution respects the co-site separation
    pub feasible: bool,
    /// Frequency pairs of the best solution breaking the co-site separation
    pub violations: usize,
    pub initial_cost: f64,
    /// Completed iterations
    pub iterations: usize,
    /// Completed iterations when the best solution was found (0 = initial)
    pub best_iteration: usize,
    pub termination: TerminationReason,
    pub elapsed: Duration,
    pub trace: Vec<IterationRecord>,
}

impl SearchResult {
    pub fn accepted_moves(&self) -> impl Iterator<Item = &Move> {
        self.trace.iter().map(|r| &r.mv)
    }
}

/// Tabu search engine bound to one problem
pub struct TabuSearch<'a> {
    problem: &'a Problem,
    config: SearchConfig,
    rng: ChaCha8Rng,
    state: SearchState,
    current: Solution,
    best: Solution,
    initial_cost: f64,
    best_iteration: usize,
    iteration: usize,
    tabu: TabuMemory,
    generator: CandidateGenerator,
    trace: Vec<IterationRecord>,
    stop: Option<Arc<AtomicBool>>,
    start: Instant,
}

impl<'a> TabuSearch<'a> {
    pub fn new(problem: &'a Problem, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let tabu = TabuMemory::new(config.tabu_tenure);
        let generator = CandidateGenerator::new(config.candidate_list_size);

        Ok(TabuSearch {
            problem,
            config,
            rng,
            state: SearchState::Initializing,
            current: Solution::empty(problem),
            best: Solution::empty(problem),
            initial_cost: f64::INFINITY,
            best_iteration: 0,
            iteration: 0,
            tabu,
            generator,
            trace: Vec::new(),
            stop: None,
            start: Instant::now(),
        })
    }

    /// Stop after the current iteration once `flag` is set
    pub fn with_stop_signal(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn current(&self) -> &Solution {
        &self.current
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Build the initial solution with the configured heuristic
    pub fn initialize(&mut self) -> Result<()> {
        self.start = Instant::now();
        let heuristic = self.config.construction.heuristic();
        let initial = heuristic.construct(self.problem, &mut self.rng)?;
        log::debug!(
            "{} construction: cost {:.2}, feasible {}",
            heuristic.name(),
            initial.cost,
            self.problem.is_feasible(&initial)
        );
        self.begin(initial);
        Ok(())
    }

    /// Start from a caller-provided solution; its cost is recomputed
    pub fn start_from(&mut self, solution: Solution) -> Result<()> {
        self.start = Instant::now();
        self.problem.check_domains()?;
        if !solution.is_complete(self.problem) {
            return Err(FapError::InvalidProblem(
                "starting solution does not cover every transceiver within its domain".to_string(),
            ));
        }
        let cost = self.problem.evaluate(&solution);
        self.begin(Solution { cost, ..solution });
        Ok(())
    }

    fn begin(&mut self, initial: Solution) {
        self.initial_cost = initial.cost;
        self.best = initial.clone();
        self.current = initial;
        self.best_iteration = 0;
        self.iteration = 0;
        self.tabu.clear();
        self.trace.clear();
        self.state = SearchState::Iterating;

        if self.config.stop_at_optimum && self.best.cost == 0.0 {
            self.terminate(TerminationReason::OptimumReached);
        } else if self.config.max_iterations == 0 {
            self.terminate(TerminationReason::MaxIterations);
        }
    }

    fn terminate(&mut self, reason: TerminationReason) {
        self.state = SearchState::Terminated(reason);
    }

    /// Run one iteration, initializing first if needed
    pub fn step(&mut self) -> Result<SearchState> {
        match self.state {
            SearchState::Initializing => self.initialize()?,
            SearchState::Terminated(_) => {}
            SearchState::Iterating => {
                let chosen = match self.config.strategy {
                    SearchStrategy::CandidateList => self.select_from_candidates(),
                    SearchStrategy::FirstImprovement => self.select_first_improvement(),
                };
                match chosen {
                    Some((mv, cost)) => self.accept(mv, cost),
                    None => self.terminate(TerminationReason::NoAdmissibleNeighbor),
                }
            }
        }
        Ok(self.state)
    }

    /// Cheapest non-tabu move of a fresh candidate sample; ties go to the
    /// earliest sampled move
    fn select_from_candidates(&mut self) -> Option<(Move, f64)> {
        let it = self.iteration;
        let candidates = self.generator.generate(self.problem, &self.current, &mut self.rng);
        let sampled = candidates.len();

        let admissible: Vec<Move> = candidates
            .into_iter()
            .filter(|mv| !self.tabu.is_move_tabu(mv, it))
            .collect();

        if admissible.len() < sampled {
            log::trace!(
                "Iter {}: {} of {} candidates tabu, {} keys active",
                it,
                sampled - admissible.len(),
                sampled,
                self.tabu.active_count(it)
            );
        }

        let problem = self.problem;
        let current = &self.current;
        let costs: Vec<f64> = if self.config.parallel {
            admissible
                .par_iter()
                .map(|mv| problem.evaluate_move(current, mv))
                .collect()
        } else {
            admissible
                .iter()
                .map(|mv| problem.evaluate_move(current, mv))
                .collect()
        };

        costs
            .iter()
            .enumerate()
            .min_by_key(|&(_, &cost)| OrderedFloat(cost))
            .map(|(i, &cost)| (admissible[i], cost))
    }

    fn select_first_improvement(&self) -> Option<(Move, f64)> {
        let it = self.iteration;
        let mut fallback: Option<(Move, f64)> = None;

        for mv in neighborhood(self.problem, &self.current) {
            if self.tabu.is_move_tabu(&mv, it) {
                continue;
            }
            let cost = self.problem.evaluate_move(&self.current, &mv);
            if cost < self.current.cost {
                return Some((mv, cost));
            }
            if fallback.map_or(true, |(_, c)| cost < c) {
                fallback = Some((mv, cost));
            }
        }

        fallback
    }

    fn accept(&mut self, mv: Move, cost: f64) {
        let it = self.iteration;
        self.current.apply(&mv);
        self.current.cost = cost;
        self.tabu.record(&mv, it);

        self.iteration += 1;
        if cost < self.best.cost {
            self.best = self.current.clone();
            self.best_iteration = self.iteration;
        }

        self.trace.push(IterationRecord {
            iteration: it,
            mv,
            current_cost: cost,
            best_cost: self.best.cost,
        });
        log::debug!(
            "Iter {}: {} current = {:.2}, best = {:.2}",
            it,
            mv,
            cost,
            self.best.cost
        );

        if self.config.stop_at_optimum && self.best.cost == 0.0 {
            self.terminate(TerminationReason::OptimumReached);
        } else if self.iteration >= self.config.max_iterations {
            self.terminate(TerminationReason::MaxIterations);
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn out_of_time(&self) -> bool {
        self.config
            .time_limit
            .map(|limit| self.start.elapsed().as_secs_f64() >= limit)
            .unwrap_or(false)
    }

    /// Iterate until a termination condition holds
    pub fn run(&mut self) -> Result<SearchResult> {
        if self.state == SearchState::Initializing {
            self.initialize()?;
        }

        log::info!(
            "Tabu search on {}: {} cells, {} TRXs, initial cost {:.2}",
            self.problem.name,
            self.problem.num_cells(),
            self.problem.total_demand(),
            self.initial_cost
        );

        loop {
            if let SearchState::Terminated(reason) = self.state {
                let result = self.result(reason);
                log::info!(
                    "Search finished ({}) after {} iterations: best cost {:.2}, feasible {}, {:.2}s",
                    reason,
                    result.iterations,
                    result.best_cost,
                    result.feasible,
                    result.elapsed.as_secs_f64()
                );
                return Ok(result);
            }

            if self.stop_requested() {
                self.terminate(TerminationReason::Cancelled);
            } else if self.out_of_time() {
                self.terminate(TerminationReason::TimeLimit);
            } else {
                self.step()?;
            }
        }
    }

    fn result(&self, termination: TerminationReason) -> SearchResult {
        SearchResult {
            best: self.best.clone(),
            best_cost: self.best.cost,
            feasible: self.problem.is_feasible(&self.best),
            violations: self.problem.co_site_violations(&self.best),
            initial_cost: self.initial_cost,
            iterations: self.iteration,
            best_iteration: self.best_iteration,
            termination,
            elapsed: self.start.elapsed(),
            trace: self.trace.clone(),
        }
    }
}

/// Build the initial solution and run a tabu search to completion
pub fn solve(problem: &Problem, config: SearchConfig) -> Result<SearchResult> {
    TabuSearch::new(problem, config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Cell, Frequency, InterferenceWeight};

    const NO_CHANNELS: [Frequency; 0] = [];

    fn scenario_a() -> Problem {
        Problem::new("A", (1, 10), NO_CHANNELS, 1, vec![Cell::new(1, "A", 2)], vec![]).unwrap()
    }

    fn scenario_b() -> Problem {
        let cells = vec![Cell::new(1, "SX", 1), Cell::new(2, "SY", 1)];
        let weights = vec![InterferenceWeight::new(1, 2, 10.0, 5.0)];
        Problem::new("B", (1, 3), NO_CHANNELS, 1, cells, weights).unwrap()
    }

    /// Six cells on three sites with a dense interference graph
    fn busy() -> Problem {
        let cells = (1..=6)
            .map(|id| Cell::new(id, format!("S{}", (id + 1) / 2), 2))
            .collect();
        let mut weights = Vec::new();
        for from in 1..=6u32 {
            for to in 1..=6u32 {
                if from != to {
                    weights.push(InterferenceWeight::new(from, to, 1.0 + from as f64, 0.5));
                }
            }
        }
        Problem::new("busy", (1, 20), [10], 2, cells, weights).unwrap()
    }

    fn config() -> SearchConfig {
        SearchConfig::default()
            .with_max_iterations(200)
            .with_tenure(5)
            .with_candidate_list_size(20)
            .with_seed(7)
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_iterations, 10_000);
        assert_eq!(config.tabu_tenure, 15);
        assert_eq!(config.candidate_list_size, 200);
        assert_eq!(config.seed, 42);
        assert_eq!(config.strategy, SearchStrategy::CandidateList);
        assert!(config.stop_at_optimum);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let problem = scenario_a();
        let zero = SearchConfig::default().with_candidate_list_size(0);
        assert!(matches!(
            TabuSearch::new(&problem, zero),
            Err(FapError::InvalidConfig(_))
        ));
        // the full scan does not need a candidate list
        let scan = SearchConfig::default()
            .with_candidate_list_size(0)
            .with_strategy(SearchStrategy::FirstImprovement);
        assert!(scan.validate().is_ok());
        assert!(SearchConfig::default().with_time_limit(-1.0).validate().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{ "tabu_tenure": 3, "strategy": "first-improvement" }"#)
                .unwrap();
        assert_eq!(config.tabu_tenure, 3);
        assert_eq!(config.strategy, SearchStrategy::FirstImprovement);
        assert_eq!(config.max_iterations, 10_000);
    }

    #[test]
    fn test_scenario_a_stops_immediately() {
        let problem = scenario_a();
        let result = solve(&problem, SearchConfig::default()).unwrap();
        assert_eq!(result.termination, TerminationReason::OptimumReached);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_cost, 0.0);
        assert!(result.feasible);
        assert!(result.trace.is_empty());
    }

    #[test]
    fn test_scenario_b_reaches_zero_from_either_start() {
        let problem = scenario_b();
        for start in [vec![vec![1], vec![1]], vec![vec![1], vec![2]]] {
            let config = SearchConfig::default()
                .with_max_iterations(100)
                .with_candidate_list_size(4)
                .with_tenure(1);
            let mut search = TabuSearch::new(&problem, config).unwrap();
            search
                .start_from(Solution::from_assignment(&problem, start))
                .unwrap();
            let result = search.run().unwrap();

            assert_eq!(result.termination, TerminationReason::OptimumReached);
            assert_eq!(result.best_cost, 0.0);
            assert!(result.iterations <= 100);
            let freqs = &result.best.assignment;
            assert!((freqs[0][0] - freqs[1][0]).abs() >= 2);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let problem = busy();
        let config = config().with_stop_at_optimum(false);
        let a = solve(&problem, config.clone()).unwrap();
        let b = solve(&problem, config).unwrap();

        assert_eq!(a.trace, b.trace);
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_cost.to_bits(), b.best_cost.to_bits());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let problem = busy();
        let sequential = solve(&problem, config().with_stop_at_optimum(false)).unwrap();
        let parallel =
            solve(&problem, config().with_stop_at_optimum(false).with_parallel(true)).unwrap();

        assert_eq!(sequential.trace, parallel.trace);
        assert_eq!(sequential.best, parallel.best);
        assert_eq!(sequential.termination, parallel.termination);
    }

    #[test]
    fn test_iteration_cap() {
        let problem = busy();
        let config = config().with_max_iterations(25).with_stop_at_optimum(false);
        let result = solve(&problem, config).unwrap();
        assert_eq!(result.termination, TerminationReason::MaxIterations);
        assert_eq!(result.iterations, 25);
        assert_eq!(result.trace.len(), 25);
        assert_eq!(result.trace.last().map(|r| r.iteration), Some(24));
    }

    #[test]
    fn test_extreme_tenure_and_list_size_run_to_completion() {
        let problem = busy();

        let huge_tenure = config()
            .with_tenure(usize::MAX)
            .with_max_iterations(5)
            .with_stop_at_optimum(false);
        let result = solve(&problem, huge_tenure).unwrap();
        assert_eq!(result.iterations, 5);
        assert_eq!(result.termination, TerminationReason::MaxIterations);

        let huge_list = config()
            .with_candidate_list_size(usize::MAX / 4)
            .with_max_iterations(5)
            .with_stop_at_optimum(false);
        assert!(huge_list.validate().is_ok());
        let result = solve(&problem, huge_list).unwrap();
        assert_eq!(result.iterations, 5);
        assert!(result.best_cost <= result.initial_cost);
    }

    #[test]
    fn test_zero_iterations_returns_initial() {
        let problem = busy();
        let config = config().with_max_iterations(0).with_stop_at_optimum(false);
        let result = solve(&problem, config).unwrap();
        assert_eq!(result.termination, TerminationReason::MaxIterations);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_cost, result.initial_cost);
    }

    #[test]
    fn test_best_is_monotonic() {
        let problem = busy();
        let result = solve(&problem, config().with_stop_at_optimum(false)).unwrap();

        let mut best = result.initial_cost;
        for record in &result.trace {
            assert!(record.best_cost <= best);
            best = best.min(record.current_cost);
            assert_eq!(record.best_cost, best);
        }
        assert_eq!(result.best_cost, best);
        assert_eq!(result.best.cost, problem.evaluate(&result.best));
        assert!(result.best.is_complete(&problem));
        assert!(result.best_iteration <= result.iterations);
    }

    #[test]
    fn test_trace_replays_from_initial_solution() {
        use crate::heuristics::construction::{ConstructionHeuristic, RandomFeasibleConstruction};

        let problem = busy();
        let result = solve(&problem, config().with_stop_at_optimum(false)).unwrap();

        // the search draws its initial solution first from the seeded generator
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut replay = RandomFeasibleConstruction.construct(&problem, &mut rng).unwrap();
        assert_eq!(replay.cost, result.initial_cost);
        let start_feasible = problem.is_feasible(&replay);

        for record in &result.trace {
            let mv = record.mv;
            assert!(problem.is_move_feasible(&replay, mv.cell, mv.slot, mv.new));
            replay.apply(&record.mv);
            assert_eq!(problem.evaluate(&replay).to_bits(), record.current_cost.to_bits());
        }
        if start_feasible {
            assert!(result.feasible);
        }
        assert_eq!(result.violations == 0, result.feasible);
    }

    #[test]
    fn test_tabu_blocks_immediate_revert() {
        // one slot, two frequencies, cost 1 whatever happens
        let cells = vec![Cell::new(1, "A", 1)];
        let weights = vec![InterferenceWeight::new(1, 1, 1.0, 0.0)];
        let problem = Problem::new("flip", (1, 2), NO_CHANNELS, 1, cells, weights).unwrap();

        let mut search = TabuSearch::new(&problem, config().with_tenure(5)).unwrap();
        search
            .start_from(Solution::from_assignment(&problem, vec![vec![1]]))
            .unwrap();
        let result = search.run().unwrap();

        let moves: Vec<Move> = result.accepted_moves().copied().collect();
        assert_eq!(moves, vec![Move::new(0, 0, 1, 2)]);
        assert_eq!(result.termination, TerminationReason::NoAdmissibleNeighbor);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_no_neighbour_at_all() {
        let cells = vec![Cell::new(1, "A", 1)];
        let weights = vec![InterferenceWeight::new(1, 1, 1.0, 0.0)];
        let problem = Problem::new("fixed", (1, 1), NO_CHANNELS, 1, cells, weights).unwrap();

        for strategy in [SearchStrategy::CandidateList, SearchStrategy::FirstImprovement] {
            let result = solve(&problem, config().with_strategy(strategy)).unwrap();
            assert_eq!(result.termination, TerminationReason::NoAdmissibleNeighbor);
            assert_eq!(result.iterations, 0);
            assert_eq!(result.best_cost, 1.0);
        }
    }

    #[test]
    fn test_first_improvement_takes_first_better_move() {
        let problem = scenario_b();
        let config = SearchConfig::default()
            .with_strategy(SearchStrategy::FirstImprovement)
            .with_tenure(5);
        let mut search = TabuSearch::new(&problem, config).unwrap();
        search
            .start_from(Solution::from_assignment(&problem, vec![vec![1], vec![1]]))
            .unwrap();
        let result = search.run().unwrap();

        // 1 -> 2 is the first move that beats 10; from (2, 1) moving back is
        // tabu and 2 -> 3 reaches 0
        let moves: Vec<Move> = result.accepted_moves().copied().collect();
        assert_eq!(moves, vec![Move::new(0, 0, 1, 2), Move::new(0, 0, 2, 3)]);
        assert_eq!(result.termination, TerminationReason::OptimumReached);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.best_iteration, 2);
    }

    #[test]
    fn test_cancellation() {
        let problem = busy();
        let flag = Arc::new(AtomicBool::new(true));
        let mut search = TabuSearch::new(&problem, config().with_stop_at_optimum(false))
            .unwrap()
            .with_stop_signal(Arc::clone(&flag));
        let result = search.run().unwrap();
        assert_eq!(result.termination, TerminationReason::Cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(search.state(), SearchState::Terminated(TerminationReason::Cancelled));
    }

    #[test]
    fn test_time_limit() {
        let problem = busy();
        let config = config()
            .with_max_iterations(usize::MAX)
            .with_stop_at_optimum(false)
            .with_time_limit(1e-9);
        let result = solve(&problem, config).unwrap();
        assert_eq!(result.termination, TerminationReason::TimeLimit);
    }

    #[test]
    fn test_step_by_step() {
        let problem = busy();
        let mut search = TabuSearch::new(&problem, config().with_stop_at_optimum(false)).unwrap();
        assert_eq!(search.state(), SearchState::Initializing);
        assert_eq!(search.step().unwrap(), SearchState::Iterating);
        assert_eq!(search.iteration(), 0);
        search.step().unwrap();
        assert_eq!(search.iteration(), 1);
        assert!(search.best().cost <= search.current().cost);
    }

    #[test]
    fn test_unsatisfiable_problem_refuses_to_run() {
        let cells = vec![Cell::new(1, "A", 4)];
        let problem = Problem::new("bad", (1, 3), NO_CHANNELS, 1, cells, vec![]).unwrap();
        assert!(matches!(
            solve(&problem, SearchConfig::default()),
            Err(FapError::InsufficientDomain { cell: 1, .. })
        ));
    }

    #[test]
    fn test_start_from_rejects_foreign_solution() {
        let problem = scenario_b();
        let mut search = TabuSearch::new(&problem, SearchConfig::default()).unwrap();
        let wrong = Solution {
            assignment: vec![vec![1]],
            cost: 0.0,
        };
        assert!(search.start_from(wrong).is_err());

        let out_of_domain = Solution {
            assignment: vec![vec![1], vec![9]],
            cost: 0.0,
        };
        assert!(search.start_from(out_of_domain).is_err());
    }
}

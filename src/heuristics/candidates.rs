//! Neighbourhood sampling for the tabu search.
//!
//! The neighbourhood of a solution is every single-slot reassignment to
//! another frequency of the cell's domain that keeps the co-site separation.

use crate::instance::Problem;
use crate::solution::{Move, Solution};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Samples a bounded candidate list of distinct feasible moves
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    /// Target number of candidates per call
    pub list_size: usize,
    /// Attempts allowed per target candidate
    pub attempt_factor: usize,
}

impl CandidateGenerator {
    pub fn new(list_size: usize) -> Self {
        CandidateGenerator {
            list_size,
            attempt_factor: 5,
        }
    }

    /// Draw up to `list_size` distinct feasible moves.
    ///
    /// Each attempt picks a random cell, a random slot of it and a random
    /// frequency of its domain. The result may be shorter than `list_size`,
    /// possibly empty. A list size beyond the neighbourhood size is clamped,
    /// both for the target and for the attempt budget.
    pub fn generate(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Move> {
        // no sample can hold more distinct moves than the neighbourhood has
        let bound = move_bound(problem, solution);
        let target = self.list_size.min(bound);
        let mut candidates = Vec::with_capacity(target);
        if target == 0 {
            return candidates;
        }

        let mut seen = HashSet::with_capacity(target);
        let budgeted = self.list_size.min(bound.saturating_mul(self.attempt_factor));
        let max_attempts = budgeted.saturating_mul(self.attempt_factor);
        let mut attempts = 0;

        while candidates.len() < target && attempts < max_attempts {
            attempts += 1;

            let cell = rng.gen_range(0..problem.num_cells());
            let freqs = solution.frequencies(cell);
            if freqs.is_empty() {
                continue;
            }
            let slot = rng.gen_range(0..freqs.len());
            let Some(&new) = problem.domain(cell).choose(rng) else {
                continue;
            };

            let old = freqs[slot];
            if new == old || !problem.is_move_feasible(solution, cell, slot, new) {
                continue;
            }

            let mv = Move::new(cell, slot, old, new);
            if seen.insert(mv) {
                candidates.push(mv);
            }
        }

        candidates
    }
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(200)
    }
}

/// Upper bound on the number of distinct moves: every occupied slot times
/// the other frequencies of its domain
fn move_bound(problem: &Problem, solution: &Solution) -> usize {
    (0..problem.num_cells())
        .map(|cell| {
            let others = problem.domain(cell).len().saturating_sub(1);
            solution.frequencies(cell).len().saturating_mul(others)
        })
        .fold(0, usize::saturating_add)
}

/// Every feasible move of `solution`, in cell, slot, then frequency order
pub fn neighborhood<'a>(
    problem: &'a Problem,
    solution: &'a Solution,
) -> impl Iterator<Item = Move> + 'a {
    (0..problem.num_cells()).flat_map(move |cell| {
        let freqs = solution.frequencies(cell);
        freqs.iter().enumerate().flat_map(move |(slot, &old)| {
            problem
                .domain(cell)
                .iter()
                .filter(move |&&new| {
                    new != old && problem.is_move_feasible(solution, cell, slot, new)
                })
                .map(move |&new| Move::new(cell, slot, old, new))
        })
    })
}

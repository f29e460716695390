//! Initial solution construction for the FAP.
//!
//! Both heuristics fill cells in index order and slots in order, preferring
//! frequencies that respect the co-site separation against everything placed
//! so far. When no such frequency is left the slot is still filled from the
//! whole domain, and the resulting violation is tolerated.

use crate::error::Result;
use crate::instance::{CellIndex, Frequency, Problem};
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub trait ConstructionHeuristic {
    fn construct(&self, problem: &Problem, rng: &mut ChaCha8Rng) -> Result<Solution>;
    fn name(&self) -> &str;
}

/// Which construction heuristic a search starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructionKind {
    /// Uniform choice among feasible frequencies
    #[default]
    Random,
    /// Lowest feasible frequency
    FirstFit,
}

impl ConstructionKind {
    pub fn heuristic(self) -> Box<dyn ConstructionHeuristic + Send + Sync> {
        match self {
            ConstructionKind::Random => Box::new(RandomFeasibleConstruction),
            ConstructionKind::FirstFit => Box::new(FirstFitConstruction),
        }
    }
}

/// Fill every slot, choosing with `pick` among the feasible frequencies or,
/// failing that, among the whole domain
fn fill_slots<F>(problem: &Problem, mut pick: F) -> Result<Solution>
where
    F: FnMut(&[Frequency]) -> Frequency,
{
    problem.check_domains()?;

    let mut solution = Solution::empty(problem);
    let mut fallbacks = 0;

    for cell in 0..problem.num_cells() {
        for _ in 0..problem.cell(cell).demand {
            let feasible = feasible_frequencies(problem, &solution, cell);
            let frequency = if feasible.is_empty() {
                fallbacks += 1;
                log::warn!(
                    "Cell {}: no frequency satisfies the co-site separation, placing one anyway",
                    problem.cell(cell).id
                );
                pick(problem.domain(cell))
            } else {
                pick(&feasible)
            };
            solution.assignment[cell].push(frequency);
        }
    }

    if fallbacks > 0 {
        log::warn!("Initial solution has {} forced placement(s)", fallbacks);
    }
    solution.cost = problem.evaluate(&solution);
    Ok(solution)
}

fn feasible_frequencies(problem: &Problem, solution: &Solution, cell: CellIndex) -> Vec<Frequency> {
    problem
        .domain(cell)
        .iter()
        .copied()
        .filter(|&f| problem.can_place(solution, cell, f))
        .collect()
}

/// Random constraint-aware construction
///
/// Picks each transceiver's frequency uniformly among those that keep the
/// co-site separation with everything already placed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFeasibleConstruction;

impl ConstructionHeuristic for RandomFeasibleConstruction {
    fn construct(&self, problem: &Problem, rng: &mut ChaCha8Rng) -> Result<Solution> {
        // check_domains guarantees a non-empty candidate list for every slot
        fill_slots(problem, |candidates| {
            candidates.choose(&mut *rng).copied().unwrap_or_default()
        })
    }

    fn name(&self) -> &str {
        "RandomFeasible"
    }
}

/// Deterministic first-fit construction
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitConstruction;

impl ConstructionHeuristic for FirstFitConstruction {
    fn construct(&self, problem: &Problem, _rng: &mut ChaCha8Rng) -> Result<Solution> {
        fill_slots(problem, |candidates| {
            candidates.first().copied().unwrap_or_default()
        })
    }

    fn name(&self) -> &str {
        "FirstFit"
    }
}

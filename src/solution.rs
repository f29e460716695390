//! Solution representation and manipulation for the FAP.
//!
//! A solution stores, for every cell of a [`Problem`], the frequencies of its
//! transceivers in slot order. Cells are addressed by their index in the
//! problem, so a solution is only meaningful next to the problem it was
//! built for.

use crate::instance::{CellId, CellIndex, Frequency, Problem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Frequency assignment with its cached interference cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// `assignment[cell][slot]` is the frequency of that transceiver
    pub assignment: Vec<Vec<Frequency>>,
    /// Total interference cost (infinite until evaluated)
    pub cost: f64,
}

impl Solution {
    /// An unassigned solution with room for every transceiver
    pub fn empty(problem: &Problem) -> Self {
        Solution {
            assignment: problem
                .cells()
                .iter()
                .map(|c| Vec::with_capacity(c.demand))
                .collect(),
            cost: f64::INFINITY,
        }
    }

    /// Build a solution from explicit frequency lists and evaluate it
    pub fn from_assignment(problem: &Problem, assignment: Vec<Vec<Frequency>>) -> Self {
        let mut solution = Solution {
            assignment,
            cost: f64::INFINITY,
        };
        solution.cost = problem.evaluate(&solution);
        solution
    }

    /// Frequencies of a cell, in slot order
    #[inline]
    pub fn frequencies(&self, cell: CellIndex) -> &[Frequency] {
        &self.assignment[cell]
    }

    /// Number of assigned transceivers
    pub fn num_assigned(&self) -> usize {
        self.assignment.iter().map(Vec::len).sum()
    }

    /// Check the structural invariants: every cell has exactly `demand`
    /// frequencies and all of them belong to its domain
    pub fn is_complete(&self, problem: &Problem) -> bool {
        self.assignment.len() == problem.num_cells()
            && self.assignment.iter().enumerate().all(|(cell, freqs)| {
                let domain = problem.domain(cell);
                freqs.len() == problem.cell(cell).demand
                    && freqs.iter().all(|f| domain.binary_search(f).is_ok())
            })
    }

    /// Apply a move in place. The cached cost is left untouched.
    pub fn apply(&mut self, mv: &Move) {
        self.assignment[mv.cell][mv.slot] = mv.new;
    }

    /// Copy of this solution with `mv` applied and the given cost cached
    pub fn with_move(&self, mv: &Move, cost: f64) -> Self {
        let mut next = self.clone();
        next.apply(mv);
        next.cost = cost;
        next
    }

    /// Assignment keyed by cell id, for reporting
    pub fn by_cell_id(&self, problem: &Problem) -> BTreeMap<CellId, Vec<Frequency>> {
        problem
            .cells()
            .iter()
            .zip(&self.assignment)
            .map(|(cell, freqs)| (cell.id, freqs.clone()))
            .collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution")?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  TRXs: {}", self.num_assigned())?;
        for (cell, freqs) in self.assignment.iter().enumerate() {
            writeln!(f, "  [{}] {:?}", cell, freqs)?;
        }
        Ok(())
    }
}

/// Reassignment of one transceiver slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub cell: CellIndex,
    pub slot: usize,
    pub old: Frequency,
    pub new: Frequency,
}

impl Move {
    pub fn new(cell: CellIndex, slot: usize, old: Frequency, new: Frequency) -> Self {
        Move {
            cell,
            slot,
            old,
            new,
        }
    }

    /// The move that undoes this one
    pub fn reversed(&self) -> Move {
        Move::new(self.cell, self.slot, self.new, self.old)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cell[{}] trx {}: {} -> {}",
            self.cell, self.slot, self.old, self.new
        )
    }
}

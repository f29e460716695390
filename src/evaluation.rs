//! Feasibility checks and interference cost evaluation.
//!
//! The only hard constraint is the co-site separation: any two frequencies
//! used at the same site (within one cell or across co-located cells) must be
//! at least `co_site_separation` channels apart. The cost is the total
//! co-channel and adjacent-channel penalty over all interference relations.

use crate::instance::{CellIndex, Frequency, Problem};
use crate::solution::{Move, Solution};

impl Problem {
    #[inline]
    fn too_close(&self, a: Frequency, b: Frequency) -> bool {
        (a - b).abs() < self.co_site_separation
    }

    /// Check the co-site separation over the whole solution
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        for cell in 0..self.num_cells() {
            let freqs = solution.frequencies(cell);
            for (i, &a) in freqs.iter().enumerate() {
                if freqs[i + 1..].iter().any(|&b| self.too_close(a, b)) {
                    return false;
                }
            }
            for &other in self.co_sited(cell).iter().filter(|&&o| o > cell) {
                let others = solution.frequencies(other);
                if freqs
                    .iter()
                    .any(|&a| others.iter().any(|&b| self.too_close(a, b)))
                {
                    return false;
                }
            }
        }
        true
    }

    /// Number of frequency pairs violating the co-site separation
    pub fn co_site_violations(&self, solution: &Solution) -> usize {
        let mut violations = 0;
        for cell in 0..self.num_cells() {
            let freqs = solution.frequencies(cell);
            for (i, &a) in freqs.iter().enumerate() {
                violations += freqs[i + 1..]
                    .iter()
                    .filter(|&&b| self.too_close(a, b))
                    .count();
            }
            for &other in self.co_sited(cell).iter().filter(|&&o| o > cell) {
                let others = solution.frequencies(other);
                for &a in freqs {
                    violations += others.iter().filter(|&&b| self.too_close(a, b)).count();
                }
            }
        }
        violations
    }

    /// Whether `frequency` can be added to `cell` next to everything already placed
    pub fn can_place(&self, solution: &Solution, cell: CellIndex, frequency: Frequency) -> bool {
        solution
            .frequencies(cell)
            .iter()
            .all(|&f| !self.too_close(f, frequency))
            && self.clear_of_co_sited(solution, cell, frequency)
    }

    /// Whether slot `slot` of `cell` can take `frequency`; the slot's current
    /// value does not count against it
    pub fn is_move_feasible(
        &self,
        solution: &Solution,
        cell: CellIndex,
        slot: usize,
        frequency: Frequency,
    ) -> bool {
        solution
            .frequencies(cell)
            .iter()
            .enumerate()
            .all(|(i, &f)| i == slot || !self.too_close(f, frequency))
            && self.clear_of_co_sited(solution, cell, frequency)
    }

    fn clear_of_co_sited(
        &self,
        solution: &Solution,
        cell: CellIndex,
        frequency: Frequency,
    ) -> bool {
        self.co_sited(cell).iter().all(|&other| {
            solution
                .frequencies(other)
                .iter()
                .all(|&f| !self.too_close(f, frequency))
        })
    }

    /// Total interference cost of a solution, recomputed from scratch
    pub fn evaluate(&self, solution: &Solution) -> f64 {
        self.sum_interference(|cell| solution.frequencies(cell))
    }

    /// Cost of `solution` with `mv` applied, without building the new solution.
    ///
    /// Uses the same summation order as [`Problem::evaluate`], so the result is
    /// bit-identical to evaluating the moved solution.
    pub fn evaluate_move(&self, solution: &Solution, mv: &Move) -> f64 {
        let mut moved = solution.frequencies(mv.cell).to_vec();
        moved[mv.slot] = mv.new;
        self.sum_interference(|cell| {
            if cell == mv.cell {
                moved.as_slice()
            } else {
                solution.frequencies(cell)
            }
        })
    }

    fn sum_interference<'a, F>(&self, frequencies: F) -> f64
    where
        F: Fn(CellIndex) -> &'a [Frequency],
    {
        let mut cost = 0.0;
        for w in self.resolved_weights() {
            let from = frequencies(w.from);
            let to = frequencies(w.to);
            for &fi in from {
                for &fj in to {
                    if fi == fj {
                        cost += w.co_channel;
                    } else if (fi - fj).abs() == 1 {
                        cost += w.adjacent_channel;
                    }
                }
            }
        }
        cost
    }
}

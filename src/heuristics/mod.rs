//! Search heuristics for the FAP.
//!
//! Construction of initial solutions, neighbourhood sampling, tabu memory
//! and the tabu search loop.

pub mod construction;
pub mod candidates;
pub mod tabu;
pub mod tabu_search;

pub use construction::*;
pub use candidates::*;
pub use tabu::*;
pub use tabu_search::*;

//! FAP Tabu Solver Library
//!
//! Frequency assignment for cellular networks: every transceiver (TRX) of a
//! cell gets a frequency so that co-channel and adjacent-channel
//! interference is minimal while frequencies used at the same site stay a
//! minimum distance apart.
//!
//! # Features
//!
//! - COST259-style `.scen` scenario parser with per-cell domains
//! - Feasibility checks and interference cost evaluation
//! - Random and first-fit initial construction
//! - Tabu search with a bounded random candidate list (or first improvement
//!   over the full neighbourhood), parallel candidate evaluation,
//!   cancellation and time limits
//! - Run log / solution reports and multi-seed benchmarking
//!
//! # Example
//!
//! ```no_run
//! use fap_tabu::instance::Problem;
//! use fap_tabu::heuristics::tabu_search::{solve, SearchConfig};
//!
//! // Load scenario
//! let problem = Problem::from_file("scenario.scen").unwrap();
//!
//! // Search with the default parameters
//! let config = SearchConfig::default().with_seed(7);
//! let result = solve(&problem, config).unwrap();
//!
//! println!("Best cost: {:.2} ({})", result.best_cost, result.termination);
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod evaluation;
pub mod heuristics;
pub mod report;
pub mod benchmark;

pub use error::{FapError, Result};
pub use instance::Problem;
pub use solution::{Move, Solution};

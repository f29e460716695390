//! Error types for the FAP solver.

use crate::instance::CellId;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FapError>;

/// Errors raised while loading a scenario or preparing a search.
///
/// Normal search terminations are not errors; see
/// [`TerminationReason`](crate::heuristics::tabu_search::TerminationReason).
#[derive(Error, Debug)]
pub enum FapError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed scenario file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Structurally invalid problem description
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// A cell can never be fully assigned
    #[error("Cell {cell} has only {domain} legal frequencies but demands {demand}")]
    InsufficientDomain {
        cell: CellId,
        domain: usize,
        demand: usize,
    },

    /// Rejected search parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FapError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        FapError::Parse {
            line,
            message: message.into(),
        }
    }
}

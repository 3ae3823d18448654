//! Boundary to the external move-search routine.
//!
//! The orchestrator only sees [`ExternalSolver`]; each adapter absorbs the call
//! shape of its concrete backend.

use async_trait::async_trait;
use thiserror::Error;

pub mod http;
pub mod process;

pub use http::HttpSolver;
pub use process::ProcessSolver;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolveFailure {
    /// The backend could not be reached or started.
    #[error("solver unavailable: {0}")]
    Unavailable(String),
    /// The backend answered but refused the cube.
    #[error("solver rejected the cube: {0}")]
    Rejected(String),
    #[error("solver failure: {0}")]
    Other(String),
}

#[async_trait]
pub trait ExternalSolver: Send + Sync {
    /// `facelets` is the 54-character URFDLB string; the result is the raw move tokens in order.
    async fn solve(&self, facelets: &str) -> Result<Vec<String>, SolveFailure>;

    fn backend_name(&self) -> &str;
}

pub struct MissingSolver;

#[async_trait]
impl ExternalSolver for MissingSolver {
    async fn solve(&self, _facelets: &str) -> Result<Vec<String>, SolveFailure> {
        Err(SolveFailure::Unavailable(
            "no solving backend is configured".to_string(),
        ))
    }

    fn backend_name(&self) -> &str {
        "missing"
    }
}

/// Extracts move tokens from a textual solver answer such as `R F2 R' U (4)`,
/// dropping move-count annotations and timing figures.
pub fn parse_solution_line(line: &str) -> Vec<String> {
    line.split_whitespace()
        .filter(|token| !token.starts_with('('))
        .filter(|token| token.chars().next().is_some_and(|c| !c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

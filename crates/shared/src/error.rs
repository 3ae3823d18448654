use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotStarted,
    Incomplete,
    WrongColorCounts,
    InvalidCenters,
    InvalidConfiguration,
    SolverUnavailable,
    UnknownSolverError,
}

impl ErrorCode {
    /// Validation-level codes are fixed by editing the cube, never by retrying.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ErrorCode::NotStarted
                | ErrorCode::Incomplete
                | ErrorCode::WrongColorCounts
                | ErrorCode::InvalidCenters
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

const INVALID_CONFIGURATION_TEXT: &str = "This cube configuration is mathematically impossible to solve. Each color must appear exactly 9 times and be in valid positions.";
const SOLVER_UNAVAILABLE_TEXT: &str =
    "The cube solver is currently unavailable. Check the solver settings and try again.";

/// Failures raised by the solve orchestrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("Invalid cube configuration: {0}")]
    InvalidConfiguration(String),
    #[error("solver not available: {0}")]
    SolverUnavailable(String),
    #[error("{0}")]
    UnknownSolverError(String),
}

impl SolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SolveError::InvalidConfiguration(_) => ErrorCode::InvalidConfiguration,
            SolveError::SolverUnavailable(_) => ErrorCode::SolverUnavailable,
            SolveError::UnknownSolverError(_) => ErrorCode::UnknownSolverError,
        }
    }

    /// Text safe to show the user. Internal detail is only exposed for unknown failures.
    pub fn user_message(&self) -> String {
        match self {
            SolveError::InvalidConfiguration(_) => INVALID_CONFIGURATION_TEXT.to_string(),
            SolveError::SolverUnavailable(_) => SOLVER_UNAVAILABLE_TEXT.to_string(),
            SolveError::UnknownSolverError(message) => format!("Solver error: {message}"),
        }
    }
}

impl From<&SolveError> for ApiError {
    fn from(value: &SolveError) -> Self {
        ApiError::new(value.code(), value.user_message())
    }
}

impl From<SolveError> for ApiError {
    fn from(value: SolveError) -> Self {
        ApiError::from(&value)
    }
}

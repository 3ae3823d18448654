//! Structural legality of a sticker description.
//!
//! Checks run in a fixed order and stop at the first failure: nothing set,
//! partially set, wrong color counts, already solved, clashing opposite centers.
//! Permutation and parity legality are not checked here; an impossible but
//! well-counted cube is left for the solving backend to refuse.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{Color, CubeState, FaceId, STICKERS_PER_FACE},
    error::ErrorCode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReasonCode {
    NotStarted,
    Incomplete { unset: usize },
    /// Only the offending colors, in W Y R O G B order.
    WrongColorCounts { counts: Vec<(Color, usize)> },
    AlreadySolved,
    InvalidCenters { pairs: Vec<(FaceId, FaceId)> },
    Solvable,
}

impl ReasonCode {
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ReasonCode::NotStarted => Some(ErrorCode::NotStarted),
            ReasonCode::Incomplete { .. } => Some(ErrorCode::Incomplete),
            ReasonCode::WrongColorCounts { .. } => Some(ErrorCode::WrongColorCounts),
            ReasonCode::InvalidCenters { .. } => Some(ErrorCode::InvalidCenters),
            ReasonCode::AlreadySolved | ReasonCode::Solvable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_structurally_valid: bool,
    pub can_solve: bool,
    pub is_already_solved: bool,
    pub reason: ReasonCode,
}

impl ValidationVerdict {
    fn from_reason(reason: ReasonCode) -> Self {
        let is_already_solved = reason == ReasonCode::AlreadySolved;
        let can_solve = reason == ReasonCode::Solvable;
        Self {
            is_structurally_valid: is_already_solved || can_solve,
            can_solve,
            is_already_solved,
            reason,
        }
    }

    /// Whether the message should be rendered as an error rather than a hint.
    pub fn show_error(&self) -> bool {
        !matches!(
            self.reason,
            ReasonCode::NotStarted | ReasonCode::AlreadySolved | ReasonCode::Solvable
        )
    }

    pub fn message(&self) -> String {
        match &self.reason {
            ReasonCode::NotStarted => "Start filling squares with colors".to_string(),
            ReasonCode::Incomplete { .. } => "Fill all squares with colors (9 of each)".to_string(),
            ReasonCode::WrongColorCounts { counts } => {
                let details = counts
                    .iter()
                    .map(|(color, count)| format!("{}:{count}", color.code()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Each color must appear exactly 9 times ({details})")
            }
            ReasonCode::AlreadySolved => "Cube is already solved!".to_string(),
            ReasonCode::InvalidCenters { .. } => {
                "Invalid cube configuration - check center positions".to_string()
            }
            ReasonCode::Solvable => "Valid cube configuration".to_string(),
        }
    }
}

pub fn validate(state: &CubeState) -> ValidationVerdict {
    let counts = state.color_counts();

    if counts.set() == 0 {
        return ValidationVerdict::from_reason(ReasonCode::NotStarted);
    }

    if counts.unset() > 0 {
        return ValidationVerdict::from_reason(ReasonCode::Incomplete {
            unset: counts.unset(),
        });
    }

    let offending: Vec<(Color, usize)> = Color::ALL
        .into_iter()
        .map(|color| (color, counts.get(color)))
        .filter(|(_, count)| *count != STICKERS_PER_FACE)
        .collect();
    if !offending.is_empty() {
        return ValidationVerdict::from_reason(ReasonCode::WrongColorCounts { counts: offending });
    }

    let monochrome = FaceId::ALL.into_iter().all(|face| {
        let stickers = state.face(face);
        stickers.iter().all(|sticker| *sticker == stickers[0])
    });
    if monochrome {
        return ValidationVerdict::from_reason(ReasonCode::AlreadySolved);
    }

    let clashes: Vec<(FaceId, FaceId)> = FaceId::OPPOSITE_PAIRS
        .into_iter()
        .filter(|(a, b)| state.center(*a) == state.center(*b))
        .collect();
    if !clashes.is_empty() {
        return ValidationVerdict::from_reason(ReasonCode::InvalidCenters { pairs: clashes });
    }

    ValidationVerdict::from_reason(ReasonCode::Solvable)
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;

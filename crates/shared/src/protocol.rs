use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body posted to an HTTP solving backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub facelets: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SolveResponse {
    /// Space-separated move sequence or already-split tokens.
    Solved {
        #[serde(default)]
        moves: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        solution: Option<String>,
    },
    Error(ApiError),
}

impl SolveResponse {
    pub fn solved(moves: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Solved {
            moves: moves.into_iter().map(Into::into).collect(),
            solution: None,
        }
    }

    /// Move tokens in order, whichever shape the backend used.
    pub fn into_tokens(self) -> Result<Vec<String>, ApiError> {
        match self {
            SolveResponse::Solved { moves, solution } => {
                let mut tokens = moves;
                if let Some(text) = solution {
                    tokens.extend(text.split_whitespace().map(str::to_string));
                }
                Ok(tokens)
            }
            SolveResponse::Error(err) => Err(err),
        }
    }
}

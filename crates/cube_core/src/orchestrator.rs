use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{STICKERS_PER_FACE, STICKER_COUNT},
    error::SolveError,
    notation::Move,
};
use solver_integration::{parse_solution_line, ExternalSolver, SolveFailure};
use tracing::{debug, info, warn};

use crate::converter::SOLVED_CANONICAL;

pub const DEFAULT_SOLVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Stand-in sequence used only under [`FallbackPolicy::Placeholder`]. It is not
/// derived from the submitted cube.
pub const PLACEHOLDER_SEQUENCE: [&str; 16] = [
    "R", "U", "R'", "U'", "F", "R", "F'", "U2", "R'", "U'", "R", "U", "R'", "F'", "U", "F",
];

const FACE_LETTERS: [char; 6] = ['U', 'R', 'F', 'D', 'L', 'B'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionOrigin {
    Solver,
    AlreadySolved,
    /// Not computed for the submitted cube.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<Move>,
    origin: SolutionOrigin,
    elapsed: Duration,
}

impl Solution {
    pub fn new(moves: Vec<Move>, origin: SolutionOrigin, elapsed: Duration) -> Self {
        Self {
            moves,
            origin,
            elapsed,
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn origin(&self) -> SolutionOrigin {
        self.origin
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_verified(&self) -> bool {
        self.origin != SolutionOrigin::Placeholder
    }
}

/// What to do when the backend cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    #[default]
    SurfaceError,
    Placeholder,
}

pub struct SolveOrchestrator {
    solver: Arc<dyn ExternalSolver>,
    timeout: Duration,
    fallback: FallbackPolicy,
}

impl SolveOrchestrator {
    pub fn new(solver: Arc<dyn ExternalSolver>) -> Self {
        Self {
            solver,
            timeout: DEFAULT_SOLVE_TIMEOUT,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.solver.backend_name()
    }

    /// Solves a canonical facelet string. Safe to call without prior validation:
    /// malformed input is refused before the backend is contacted.
    pub async fn solve(&self, canonical: &str) -> Result<Solution, SolveError> {
        let started = Instant::now();
        check_letter_counts(canonical)?;

        if canonical == SOLVED_CANONICAL {
            info!("cube already solved; skipping solver");
            return Ok(Solution::new(
                Vec::new(),
                SolutionOrigin::AlreadySolved,
                started.elapsed(),
            ));
        }

        debug!(backend = self.solver.backend_name(), %canonical, "submitting cube to solver");
        let outcome = match tokio::time::timeout(self.timeout, self.solver.solve(canonical)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(SolveFailure::Unavailable(format!(
                "no answer within {}s",
                self.timeout.as_secs_f32()
            ))),
        };

        match outcome {
            Ok(tokens) => {
                let moves: Vec<Move> = tokens
                    .iter()
                    .flat_map(|token| parse_solution_line(token))
                    .map(Move::new)
                    .collect();
                if moves.is_empty() {
                    return Err(SolveError::UnknownSolverError(
                        "solver returned no moves for an unsolved cube".to_string(),
                    ));
                }
                let elapsed = started.elapsed();
                info!(
                    moves = moves.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "solution found"
                );
                Ok(Solution::new(moves, SolutionOrigin::Solver, elapsed))
            }
            Err(SolveFailure::Unavailable(reason)) => match self.fallback {
                FallbackPolicy::SurfaceError => {
                    warn!(%reason, "solver unavailable");
                    Err(SolveError::SolverUnavailable(reason))
                }
                FallbackPolicy::Placeholder => {
                    warn!(
                        %reason,
                        "solver unavailable; substituting placeholder sequence unrelated to this cube"
                    );
                    Ok(Solution::new(
                        PLACEHOLDER_SEQUENCE.iter().copied().map(Move::new).collect(),
                        SolutionOrigin::Placeholder,
                        started.elapsed(),
                    ))
                }
            },
            Err(SolveFailure::Rejected(message)) | Err(SolveFailure::Other(message)) => {
                warn!(%message, "solver failed");
                Err(SolveError::UnknownSolverError(message))
            }
        }
    }
}

fn check_letter_counts(canonical: &str) -> Result<(), SolveError> {
    let length = canonical.chars().count();
    if length != STICKER_COUNT {
        return Err(SolveError::InvalidConfiguration(format!(
            "expected {STICKER_COUNT} facelets, got {length}"
        )));
    }

    for letter in FACE_LETTERS {
        let count = canonical.chars().filter(|c| *c == letter).count();
        if count != STICKERS_PER_FACE {
            return Err(SolveError::InvalidConfiguration(format!(
                "face letter {letter} appears {count} times"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;

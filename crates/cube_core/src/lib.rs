//! Cube state validation, solver-format conversion, solve orchestration and
//! step-by-step solution playback.

pub mod config;
pub mod converter;
pub mod orchestrator;
pub mod playback;
pub mod scheduler;
pub mod session;
pub mod timeline;
pub mod validator;

pub use converter::{to_canonical, CanonicalString, SOLVED_CANONICAL};
pub use orchestrator::{FallbackPolicy, Solution, SolutionOrigin, SolveOrchestrator};
pub use playback::{PlaybackController, PlaybackEvent, PlaybackState, PlaybackTiming};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TimerId, TokioScheduler};
pub use session::{CubeSession, SessionError, SolveOutcome, SolveTicket};
pub use validator::{validate, ReasonCode, ValidationVerdict};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

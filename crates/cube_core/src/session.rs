//! The editable cube and everything derived from it.
//!
//! Every write to the cube bumps the revision, recomputes the verdict, drops the
//! solution and rewinds playback before returning, so a move list is never
//! observable against a cube it was not computed for. Solve results carry the
//! revision they were requested at and are discarded if the cube moved on.

use std::sync::Arc;

use shared::{
    domain::{CubeState, CubeStateError, FaceId, Sticker},
    error::{ApiError, SolveError},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    converter::{to_canonical, CanonicalString},
    orchestrator::{Solution, SolveOrchestrator},
    playback::{PlaybackController, PlaybackTiming},
    scheduler::{Scheduler, TimerId},
    timeline::Timeline,
    validator::{validate, ReasonCode, ValidationVerdict},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cube cannot be submitted: {message}")]
    NotSolvable { reason: ReasonCode, message: String },
    #[error("a solve is already in progress")]
    SolveInProgress,
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    State(#[from] CubeStateError),
}

/// Proof that a solve was started for a particular revision of the cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveTicket {
    id: u64,
    revision: u64,
    canonical: CanonicalString,
}

impl SolveTicket {
    pub fn canonical(&self) -> &CanonicalString {
        &self.canonical
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Installed { moves: usize },
    AlreadySolved,
    /// The cube changed or the solve was cancelled while it was in flight.
    Discarded,
}

pub struct CubeSession {
    timeline: Timeline<CubeState>,
    verdict: ValidationVerdict,
    solution: Option<Solution>,
    playback: PlaybackController,
    solver_error: Option<ApiError>,
    revision: u64,
    next_ticket: u64,
    pending_ticket: Option<u64>,
}

impl CubeSession {
    pub fn new(scheduler: Arc<dyn Scheduler>, timing: PlaybackTiming) -> Self {
        let state = CubeState::empty();
        Self {
            verdict: validate(&state),
            timeline: Timeline::new(state),
            solution: None,
            playback: PlaybackController::new(scheduler, timing),
            solver_error: None,
            revision: 0,
            next_ticket: 1,
            pending_ticket: None,
        }
    }

    pub fn state(&self) -> &CubeState {
        self.timeline.current()
    }

    pub fn verdict(&self) -> &ValidationVerdict {
        &self.verdict
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    pub fn solver_error(&self) -> Option<&ApiError> {
        self.solver_error.as_ref()
    }

    /// The error to show next to the cube, if any: the last solve failure, or
    /// else a validation problem.
    pub fn user_error(&self) -> Option<ApiError> {
        if let Some(err) = &self.solver_error {
            return Some(err.clone());
        }
        if !self.verdict.show_error() {
            return None;
        }
        self.verdict
            .reason
            .error_code()
            .map(|code| ApiError::new(code, self.verdict.message()))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_solving(&self) -> bool {
        self.pending_ticket.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        let verdict = validate(self.timeline.current());
        if verdict.reason != self.verdict.reason {
            info!(reason = ?verdict.reason, revision = self.revision, "verdict changed");
        }
        self.verdict = verdict;
        if self.solution.take().is_some() {
            debug!(revision = self.revision, "solution discarded after cube change");
        }
        self.playback.clear();
        self.solver_error = None;
    }

    fn record(&mut self, state: CubeState) {
        self.timeline.push(state);
        self.invalidate();
    }

    pub fn set_sticker(
        &mut self,
        face: FaceId,
        index: usize,
        sticker: Sticker,
    ) -> Result<(), SessionError> {
        let mut state = self.timeline.current().clone();
        state.set_sticker(face, index, sticker)?;
        self.record(state);
        Ok(())
    }

    pub fn replace_state(&mut self, state: CubeState) {
        self.record(state);
    }

    pub fn reset(&mut self) {
        self.record(CubeState::empty());
    }

    pub fn set_solved(&mut self) {
        self.record(CubeState::solved());
    }

    pub fn undo(&mut self) -> bool {
        if self.timeline.undo().is_none() {
            return false;
        }
        self.invalidate();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.timeline.redo().is_none() {
            return false;
        }
        self.invalidate();
        true
    }

    /// Issues a ticket for the current cube. Only one solve may be outstanding.
    pub fn begin_solve(&mut self) -> Result<SolveTicket, SessionError> {
        if self.pending_ticket.is_some() {
            return Err(SessionError::SolveInProgress);
        }
        if !self.verdict.can_solve {
            return Err(SessionError::NotSolvable {
                reason: self.verdict.reason.clone(),
                message: self.verdict.message(),
            });
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending_ticket = Some(id);
        self.solver_error = None;
        let canonical = to_canonical(self.timeline.current());
        debug!(ticket = id, revision = self.revision, %canonical, "solve started");
        Ok(SolveTicket {
            id,
            revision: self.revision,
            canonical,
        })
    }

    pub fn finish_solve(
        &mut self,
        ticket: SolveTicket,
        result: Result<Solution, SolveError>,
    ) -> Result<SolveOutcome, SessionError> {
        if self.pending_ticket != Some(ticket.id) {
            debug!(ticket = ticket.id, "result for abandoned solve dropped");
            return Ok(SolveOutcome::Discarded);
        }
        self.pending_ticket = None;

        if ticket.revision != self.revision {
            info!(
                requested = ticket.revision,
                current = self.revision,
                "cube changed during solve; discarding result"
            );
            return Ok(SolveOutcome::Discarded);
        }

        let solution = match result {
            Ok(solution) => solution,
            Err(err) => {
                warn!(code = ?err.code(), %err, "solve failed");
                self.solver_error = Some(ApiError::from(&err));
                return Err(err.into());
            }
        };

        if solution.is_empty() {
            self.playback.clear();
            self.solution = Some(solution);
            return Ok(SolveOutcome::AlreadySolved);
        }

        let moves = solution.len();
        self.playback.load(solution.moves().to_vec());
        self.solution = Some(solution);
        Ok(SolveOutcome::Installed { moves })
    }

    pub fn cancel_solve(&mut self) {
        if let Some(id) = self.pending_ticket.take() {
            debug!(ticket = id, "solve cancelled");
        }
    }

    pub async fn solve(
        &mut self,
        orchestrator: &SolveOrchestrator,
    ) -> Result<SolveOutcome, SessionError> {
        let ticket = self.begin_solve()?;
        let result = orchestrator.solve(ticket.canonical().as_str()).await;
        self.finish_solve(ticket, result)
    }

    pub fn on_timer(&mut self, id: TimerId) {
        self.playback.on_timer(id);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

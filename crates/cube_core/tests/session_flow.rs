use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use cube_core::{
    CubeSession, ManualScheduler, PlaybackEvent, PlaybackState, PlaybackTiming, ReasonCode,
    SessionError, SolveOrchestrator, SolveOutcome,
};
use shared::domain::{Color, CubeState, FaceId};
use solver_integration::{ExternalSolver, SolveFailure};

/// Answers every cube with the same move list and counts how often it was asked.
struct FixedSolver {
    moves: Vec<&'static str>,
    calls: AtomicUsize,
}

impl FixedSolver {
    fn new(moves: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            moves: moves.to_vec(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExternalSolver for FixedSolver {
    async fn solve(&self, _facelets: &str) -> Result<Vec<String>, SolveFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.moves.iter().map(|m| m.to_string()).collect())
    }

    fn backend_name(&self) -> &str {
        "fixed"
    }
}

fn session() -> (CubeSession, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let session = CubeSession::new(Arc::new(scheduler.clone()), PlaybackTiming::default());
    (session, scheduler)
}

/// Solved except the top-front edge is flipped.
const FLIPPED_EDGE: &str = "WWWWWWWRWGGGGGGGGGRWRRRRRRRYYYYYYYYYBBBBBBBBBOOOOOOOOO";

/// Solved except the top center and one bottom sticker trade colors, leaving
/// both centers yellow.
fn clashing_centers() -> CubeState {
    let mut state = CubeState::solved();
    state
        .set_sticker(FaceId::Up, 4, Some(Color::Yellow))
        .expect("set");
    state
        .set_sticker(FaceId::Down, 0, Some(Color::White))
        .expect("set");
    state
}

#[tokio::test]
async fn edit_validate_solve_and_play_back() {
    let (mut session, scheduler) = session();
    let solver = FixedSolver::new(&["F", "R", "U'"]);
    let orchestrator = SolveOrchestrator::new(solver.clone());

    session.replace_state(CubeState::from_str(FLIPPED_EDGE).expect("stickers"));
    assert!(session.verdict().can_solve);

    let outcome = session.solve(&orchestrator).await.expect("solve");
    assert_eq!(outcome, SolveOutcome::Installed { moves: 3 });
    assert_eq!(solver.calls(), 1);

    let mut events = session.playback().subscribe_events();
    session.playback_mut().toggle_auto_play();
    scheduler.advance(Duration::from_secs(7), |id| session.on_timer(id));

    assert_eq!(session.playback().position(), Some(2));
    assert_eq!(session.playback().state(), PlaybackState::Ready);

    let mut started = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let PlaybackEvent::MoveStarted { notation, .. } = event {
            started.push(notation);
        }
    }
    assert_eq!(started, vec!["F", "R", "U'"]);
}

#[tokio::test]
async fn editing_mid_playback_resets_everything() {
    let (mut session, scheduler) = session();
    let orchestrator = SolveOrchestrator::new(FixedSolver::new(&["F", "R"]));
    session.replace_state(CubeState::from_str(FLIPPED_EDGE).expect("stickers"));
    session.solve(&orchestrator).await.expect("solve");

    session.playback_mut().toggle_auto_play();
    scheduler.advance(Duration::from_millis(2500), |id| session.on_timer(id));
    assert!(session.playback().animating_move().is_some());

    session.set_solved();
    assert!(session.solution().is_none());
    assert_eq!(session.playback().position(), None);
    assert_eq!(session.playback().state(), PlaybackState::Idle);
    assert_eq!(scheduler.pending(), 0);

    scheduler.advance(Duration::from_secs(10), |id| session.on_timer(id));
    assert_eq!(session.playback().position(), None);
}

#[tokio::test]
async fn clashing_centers_never_reach_the_solver() {
    let (mut session, _scheduler) = session();
    let solver = FixedSolver::new(&["R"]);
    let orchestrator = SolveOrchestrator::new(solver.clone());

    session.replace_state(clashing_centers());
    assert_eq!(
        session.verdict().reason,
        ReasonCode::InvalidCenters {
            pairs: vec![(FaceId::Up, FaceId::Down)]
        }
    );

    let err = session.solve(&orchestrator).await.expect_err("refused");
    assert!(matches!(err, SessionError::NotSolvable { .. }));
    assert_eq!(solver.calls(), 0);
}

#[tokio::test]
async fn late_result_for_edited_cube_is_dropped() {
    let (mut session, _scheduler) = session();
    let orchestrator = SolveOrchestrator::new(FixedSolver::new(&["F", "R"]));
    session.replace_state(CubeState::from_str(FLIPPED_EDGE).expect("stickers"));

    let ticket = session.begin_solve().expect("ticket");
    let result = orchestrator.solve(ticket.canonical().as_str()).await;
    session.reset();

    let outcome = session.finish_solve(ticket, result).expect("finish");
    assert_eq!(outcome, SolveOutcome::Discarded);
    assert!(session.solution().is_none());
    assert_eq!(session.playback().state(), PlaybackState::Idle);
}

#[tokio::test]
async fn solving_twice_at_once_is_rejected() {
    let (mut session, _scheduler) = session();
    session.replace_state(CubeState::from_str(FLIPPED_EDGE).expect("stickers"));

    let first = session.begin_solve().expect("first");
    assert!(matches!(
        session.begin_solve(),
        Err(SessionError::SolveInProgress)
    ));

    session.cancel_solve();
    let second = session.begin_solve().expect("second after cancel");
    assert_ne!(first, second);
}

#[tokio::test]
async fn unconfigured_solver_surfaces_unavailable() {
    let (mut session, _scheduler) = session();
    let orchestrator = cube_core::config::build_orchestrator(&Default::default()).expect("build");
    session.replace_state(CubeState::from_str(FLIPPED_EDGE).expect("stickers"));

    let err = session.solve(&orchestrator).await.expect_err("unavailable");
    assert!(matches!(
        err,
        SessionError::Solve(shared::error::SolveError::SolverUnavailable(_))
    ));
    assert!(session.playback().is_empty());
}

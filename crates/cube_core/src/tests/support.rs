//! Scripted solving backend shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use solver_integration::{ExternalSolver, SolveFailure};

pub const SCRAMBLED: &str = "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD";

pub struct ScriptedSolver {
    answers: Mutex<VecDeque<Result<Vec<String>, SolveFailure>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedSolver {
    pub fn answering(moves: &[&str]) -> Self {
        Self::with_answers(vec![Ok(moves.iter().map(|m| m.to_string()).collect())])
    }

    pub fn failing(failure: SolveFailure) -> Self {
        Self::with_answers(vec![Err(failure)])
    }

    pub fn with_answers(answers: Vec<Result<Vec<String>, SolveFailure>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl ExternalSolver for ScriptedSolver {
    async fn solve(&self, facelets: &str) -> Result<Vec<String>, SolveFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("seen lock").push(facelets.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .unwrap_or_else(|| Err(SolveFailure::Other("script exhausted".to_string())))
    }

    fn backend_name(&self) -> &str {
        "scripted"
    }
}

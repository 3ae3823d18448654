//! Step-by-step playback of a solution.
//!
//! Position `None` is "before the first move". Forward steps are two-phase: the
//! upcoming move is announced, and the position only advances once the settle
//! timer fires. Auto-play re-arms a cadence timer that starts a forward step
//! whenever none is in flight.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use shared::notation::Move;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::scheduler::{Scheduler, TimerHandle, TimerId};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Ready,
    AutoPlaying,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Emitted before the position commits, for animation start.
    MoveStarted { step: usize, notation: String },
    PositionChanged { position: Option<usize> },
    StateChanged(PlaybackState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub settle_delay: Duration,
    pub auto_play_interval: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1000),
            auto_play_interval: Duration::from_millis(2000),
        }
    }
}

type MoveObserver = Box<dyn Fn(&Move) + Send + Sync>;

#[derive(Debug)]
struct PendingAdvance {
    step: usize,
    timer: TimerHandle,
}

pub struct PlaybackController {
    scheduler: Arc<dyn Scheduler>,
    timing: PlaybackTiming,
    moves: Vec<Move>,
    position: Option<usize>,
    auto_playing: bool,
    pending: Option<PendingAdvance>,
    ticker: Option<TimerHandle>,
    observer: Option<MoveObserver>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackController {
    pub fn new(scheduler: Arc<dyn Scheduler>, timing: PlaybackTiming) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            scheduler,
            timing,
            moves: Vec::new(),
            position: None,
            auto_playing: false,
            pending: None,
            ticker: None,
            observer: None,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Registers a callback run synchronously with each announced move.
    pub fn set_observer(&mut self, observer: impl Fn(&Move) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn state(&self) -> PlaybackState {
        if self.moves.is_empty() {
            PlaybackState::Idle
        } else if self.auto_playing {
            PlaybackState::AutoPlaying
        } else {
            PlaybackState::Ready
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.position
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

    pub fn current_move(&self) -> Option<&Move> {
        self.position.and_then(|step| self.moves.get(step))
    }

    /// Move announced but not yet committed.
    pub fn animating_move(&self) -> Option<&Move> {
        self.pending
            .as_ref()
            .and_then(|pending| self.moves.get(pending.step))
    }

    fn at_terminal(&self) -> bool {
        match self.position {
            Some(step) => step + 1 >= self.moves.len(),
            None => self.moves.is_empty(),
        }
    }

    fn next_step(&self) -> usize {
        self.position.map_or(0, |step| step + 1)
    }

    fn emit_state_change(&self, before: PlaybackState) {
        let after = self.state();
        if after != before {
            debug!(?before, ?after, "playback state changed");
            let _ = self.events.send(PlaybackEvent::StateChanged(after));
        }
    }

    fn set_position(&mut self, position: Option<usize>) {
        if self.position != position {
            self.position = position;
            let _ = self
                .events
                .send(PlaybackEvent::PositionChanged { position });
        }
    }

    fn cancel_timers(&mut self) {
        self.auto_playing = false;
        self.pending = None;
        self.ticker = None;
    }

    /// Installs a new move list and rewinds. An empty list leaves the controller idle.
    pub fn load(&mut self, moves: Vec<Move>) {
        let before = self.state();
        self.cancel_timers();
        self.moves = moves;
        self.set_position(None);
        if self.moves.is_empty() {
            debug!("playback cleared");
        } else {
            info!(moves = self.moves.len(), "playback loaded");
        }
        self.emit_state_change(before);
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Announces the next move and schedules its commit. Ignored while idle, at
    /// the last step, or while another move is still settling.
    pub fn next(&mut self) {
        if self.moves.is_empty() || self.pending.is_some() || self.at_terminal() {
            return;
        }
        self.begin_advance();
    }

    fn begin_advance(&mut self) {
        let step = self.next_step();
        let Some(upcoming) = self.moves.get(step) else {
            return;
        };
        if let Some(observer) = &self.observer {
            observer(upcoming);
        }
        let _ = self.events.send(PlaybackEvent::MoveStarted {
            step,
            notation: upcoming.notation().to_string(),
        });

        let timer = self.scheduler.schedule(self.timing.settle_delay);
        debug!(step, timer = %timer.id(), "move announced");
        self.pending = Some(PendingAdvance { step, timer });
    }

    pub fn previous(&mut self) {
        let before = self.state();
        self.cancel_timers();
        let position = match self.position {
            Some(0) | None => None,
            Some(step) => Some(step - 1),
        };
        self.set_position(position);
        self.emit_state_change(before);
    }

    /// Jumps to `step`. Requests outside the loaded solution are ignored entirely.
    pub fn go_to(&mut self, step: Option<usize>) {
        if matches!(step, Some(index) if index >= self.moves.len()) {
            debug!(?step, len = self.moves.len(), "ignoring out-of-range jump");
            return;
        }
        let before = self.state();
        self.cancel_timers();
        self.set_position(step);
        self.emit_state_change(before);
    }

    /// Starts or stops auto-play. Starting is refused when idle or already at
    /// the last step.
    pub fn toggle_auto_play(&mut self) {
        let before = self.state();
        if self.auto_playing {
            self.cancel_timers();
        } else {
            if self.moves.is_empty() || self.at_terminal() {
                debug!("auto-play has nothing left to play");
                return;
            }
            self.auto_playing = true;
            self.ticker = Some(self.scheduler.schedule(self.timing.auto_play_interval));
        }
        self.emit_state_change(before);
    }

    /// Delivers an expired timer. Ids that no longer belong to a live timer are
    /// dropped.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.pending.as_ref().is_some_and(|p| p.timer.id() == id) {
            self.commit_advance();
        } else if self.ticker.as_ref().is_some_and(|t| t.id() == id) {
            self.tick();
        } else {
            debug!(timer = %id, "ignoring stale timer");
        }
    }

    fn commit_advance(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let before = self.state();
        self.set_position(Some(pending.step));
        if self.auto_playing && self.at_terminal() {
            self.cancel_timers();
        }
        self.emit_state_change(before);
    }

    fn tick(&mut self) {
        let before = self.state();
        if self.at_terminal() {
            self.cancel_timers();
            self.emit_state_change(before);
            return;
        }
        self.ticker = Some(self.scheduler.schedule(self.timing.auto_play_interval));
        if self.pending.is_none() {
            self.begin_advance();
        }
    }
}

#[cfg(test)]
#[path = "tests/playback_tests.rs"]
mod tests;

//! Replay session with statum state machine
//!
//! ```text
//! Loaded ──► Running ──► Finished
//! ```
//!
//! The feeder task reads the script and pushes steps into a channel; the
//! session owns the gamepad and applies every step it receives until the
//! feeder hangs up.
//!
//! ```text
//! GestureScript ──► [feeder task] ──► mpsc ──► ReplaySession<Running> ──► Gamepad
//! ```

use crate::gamepad::{Gamepad, GamepadError, GamepadSnapshot, HeadlessHost};
use crate::replay::error::ReplayError;
use crate::replay::script::{GestureKind, GestureScript, GestureStep};
use serde::Serialize;
use statum::{machine, state};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const CHANNEL_CAPACITY: usize = 64;

#[state]
#[derive(Debug, Clone)]
pub enum ReplayState {
    Loaded,
    Running,
    Finished,
}

#[machine]
pub struct ReplaySession<S: ReplayState> {
    gamepad: Gamepad<HeadlessHost>,
    applied: usize,
    ignored: usize,
}

/// Outcome of a finished replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Steps at least one controller reacted to
    pub applied: usize,
    pub ignored: usize,
    pub snapshot: GamepadSnapshot,
}

impl<S: ReplayState> ReplaySession<S> {
    pub fn gamepad(&self) -> &Gamepad<HeadlessHost> {
        &self.gamepad
    }
}

impl ReplaySession<Loaded> {
    pub fn create(gamepad: Gamepad<HeadlessHost>) -> Self {
        info!("Replay session loaded with {} controllers", gamepad.len());
        Self::new(gamepad, 0, 0)
    }

    pub fn start(self) -> ReplaySession<Running> {
        info!("Starting replay");
        self.transition()
    }
}

impl ReplaySession<Running> {
    /// Applies a single step. Returns whether any controller reacted.
    pub fn apply(&mut self, step: &GestureStep) -> Result<bool, ReplayError> {
        let event = step.event();

        let handled = match step.kind {
            GestureKind::Start => {
                let target = step.target.as_deref().unwrap_or_default();
                match self.gamepad.pointer_down(target, &event) {
                    Ok(handled) => handled,
                    Err(GamepadError::UnknownController(id)) => {
                        warn!("Start event for unknown controller '{}'", id);
                        false
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            GestureKind::Move => self.gamepad.pointer_move(&event) > 0,
            GestureKind::End => self.gamepad.pointer_up(&event) > 0,
            GestureKind::Cancel => self.gamepad.pointer_cancel(&event) > 0,
            GestureKind::Click => {
                self.gamepad.handle_click();
                true
            }
            GestureKind::Vibrate => match &step.pattern {
                Some(pattern) => {
                    self.gamepad.vibrate(pattern.clone());
                    true
                }
                None => false,
            },
        };

        if handled {
            self.applied += 1;
        } else {
            self.ignored += 1;
            debug!("{:?} step for pointer {} had no effect", step.kind, event.pointer_id);
        }
        Ok(handled)
    }

    /// Applies steps until the sender side is dropped
    pub async fn run(
        mut self,
        mut steps: mpsc::Receiver<GestureStep>,
    ) -> Result<ReplaySession<Finished>, ReplayError> {
        while let Some(step) = steps.recv().await {
            self.apply(&step)?;
            trace!("Axes after step: {:?}", self.gamepad.snapshot().axes);
        }

        info!(
            "Replay finished: {} applied, {} ignored",
            self.applied, self.ignored
        );
        Ok(self.transition())
    }
}

impl ReplaySession<Finished> {
    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            applied: self.applied,
            ignored: self.ignored,
            snapshot: self.gamepad.snapshot(),
        }
    }

    pub fn into_gamepad(self) -> Gamepad<HeadlessHost> {
        self.gamepad
    }
}

/// Spawns a task that sends every step of `script` into a channel, pausing
/// `interval` between steps when given. The task resolves to the number of
/// steps delivered.
pub fn spawn_feeder(
    script: GestureScript,
    interval: Option<Duration>,
) -> (mpsc::Receiver<GestureStep>, JoinHandle<usize>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut sent = 0;
        for step in script.events {
            if tx.send(step).await.is_err() {
                warn!("Replay session dropped, stopping feeder after {} steps", sent);
                break;
            }
            sent += 1;
            if let Some(interval) = interval {
                tokio::time::sleep(interval).await;
            }
        }
        debug!("Feeder done, {} steps sent", sent);
        sent
    });

    (rx, handle)
}

/// Replays `script` against `gamepad` and returns the finished session
pub async fn replay(
    gamepad: Gamepad<HeadlessHost>,
    script: GestureScript,
    interval: Option<Duration>,
) -> Result<ReplaySession<Finished>, ReplayError> {
    let (steps, feeder) = spawn_feeder(script, interval);
    let finished = ReplaySession::create(gamepad).start().run(steps).await?;

    if let Err(e) = feeder.await {
        warn!("Feeder task failed: {}", e);
    }
    Ok(finished)
}

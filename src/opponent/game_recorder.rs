//! Sinks for finished-game summaries.
//!
//! Recording is fire-and-forget: [`hand_off`] runs the recorder on its own
//! task and returns at once. A recorder that fails logs its own error and
//! never reports back to the session.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::session::summary::GameSummary;

#[async_trait]
pub trait GameRecorder: Send + Sync {
    async fn record_game(&self, summary: GameSummary);
}

/// Start `recorder` on `summary` without waiting for it.
///
/// Inside a tokio runtime the recording is a spawned task. Outside one it
/// gets a short-lived thread with its own current-thread runtime.
pub fn hand_off(recorder: Arc<dyn GameRecorder>, summary: GameSummary) {
    if let Ok(handle) = Handle::try_current() {
        let _detached = handle.spawn(async move { recorder.record_game(summary).await });
        return;
    }

    let spawned = std::thread::Builder::new()
        .name("game-recorder".to_owned())
        .spawn(move || match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(recorder.record_game(summary)),
            Err(err) => warn!(target: "chess_session::recorder", error = %err, "no runtime for the game recorder"),
        });
    if let Err(err) = spawned {
        warn!(target: "chess_session::recorder", error = %err, "could not start the game recorder");
    }
}

/// Logs each summary as a JSON line at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

#[async_trait]
impl GameRecorder for TracingRecorder {
    async fn record_game(&self, summary: GameSummary) {
        match serde_json::to_string(&summary) {
            Ok(json) => info!(target: "chess_session::recorder", summary = %json, "game recorded"),
            Err(err) => warn!(target: "chess_session::recorder", error = %err, "could not serialize game summary"),
        }
    }
}

/// Keeps every summary in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    games: Mutex<Vec<GameSummary>>,
    recorded: Notify,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> Vec<GameSummary> {
        self.games.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }

    /// Waits until at least `count` summaries have arrived.
    pub async fn wait_for_games(&self, count: usize) -> Vec<GameSummary> {
        loop {
            let recorded = self.recorded.notified();
            if self.len() >= count {
                return self.games();
            }
            recorded.await;
        }
    }
}

#[async_trait]
impl GameRecorder for MemoryRecorder {
    async fn record_game(&self, summary: GameSummary) {
        self.games.lock().push(summary);
        self.recorded.notify_waiters();
    }
}

//! Async driver for a single game.
//!
//! One task owns the `GameSession` and the countdown interval. Timer ticks
//! and player actions are applied strictly one at a time, and every applied
//! event publishes a fresh `Session` snapshot.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use trivia_core::model::Lifeline;
use trivia_core::{GameEvent, Outcome, Session};

use crate::error::GameServiceError;
use crate::game_service::{GameService, GameSession};

const COMMAND_BUFFER: usize = 32;

struct Command {
    event: GameEvent,
    reply: oneshot::Sender<Result<Outcome, GameServiceError>>,
}

/// Handle to a running game task.
pub struct GameDriver {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Session>,
    task: JoinHandle<GameSession>,
}

impl GameDriver {
    /// Spawn the driver on the current runtime.
    ///
    /// Dropping the handle without `shutdown` abandons a running game; the
    /// result is still recorded and the task then exits.
    #[must_use]
    pub fn spawn(service: Arc<GameService>, game: GameSession) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshots) = watch::channel(game.session().clone());
        let task = tokio::spawn(run_driver(service, game, rx, snapshot_tx));

        Self {
            commands,
            snapshots,
            task,
        }
    }

    /// Send a player event and wait for its outcome.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::DriverClosed` if the driver task is gone,
    /// or the error the game service produced for the event.
    pub async fn send(&self, event: GameEvent) -> Result<Outcome, GameServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { event, reply })
            .await
            .map_err(|_| GameServiceError::DriverClosed)?;
        response.await.map_err(|_| GameServiceError::DriverClosed)?
    }

    /// # Errors
    ///
    /// See [`GameDriver::send`].
    pub async fn submit_answer(&self, index: usize) -> Result<Outcome, GameServiceError> {
        self.send(GameEvent::SubmitAnswer(index)).await
    }

    /// # Errors
    ///
    /// See [`GameDriver::send`].
    pub async fn use_lifeline(&self, lifeline: Lifeline) -> Result<Outcome, GameServiceError> {
        self.send(GameEvent::UseLifeline(lifeline)).await
    }

    /// # Errors
    ///
    /// See [`GameDriver::send`].
    pub async fn advance(&self) -> Result<Outcome, GameServiceError> {
        self.send(GameEvent::Advance).await
    }

    /// # Errors
    ///
    /// See [`GameDriver::send`].
    pub async fn end_game(&self) -> Result<Outcome, GameServiceError> {
        self.send(GameEvent::End).await
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshots.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.snapshots.borrow().clone()
    }

    /// Abandon the game if it is still running, then wait for the driver and
    /// return the final game.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::DriverClosed` if the driver task panicked.
    pub async fn shutdown(self) -> Result<GameSession, GameServiceError> {
        // Ending an already ended game is a no-op, so this is safe either way.
        let _ = self.send(GameEvent::End).await;
        drop(self.commands);
        self.task
            .await
            .map_err(|_| GameServiceError::DriverClosed)
    }
}

fn countdown(service: &GameService) -> Interval {
    let period = service.settings().tick_interval();
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn run_driver(
    service: Arc<GameService>,
    mut game: GameSession,
    mut rx: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Session>,
) -> GameSession {
    tracing::debug!("game driver started");
    let mut interval = countdown(&service);
    loop {
        let ticking = game.session().is_active();
        let pending = tokio::select! {
            command = rx.recv() => {
                let Some(Command { event, reply }) = command else {
                    break;
                };
                let result = service.apply(&mut game, event).await;
                // A new question gets a full period before its first tick.
                if matches!(result, Ok(Outcome::Advanced { .. } | Outcome::Skipped { .. })) {
                    interval.reset();
                }
                Some((reply, result))
            }
            _ = interval.tick(), if ticking => {
                if let Err(err) = service.tick(&mut game).await {
                    tracing::warn!(error = %err, "tick rejected");
                }
                None
            }
        };

        // Publish before replying so callers never observe a stale snapshot.
        snapshots.send_replace(game.session().clone());
        if let Some((reply, result)) = pending {
            // The caller may have stopped waiting.
            let _ = reply.send(result);
        }
    }

    if game.session().is_active() {
        tracing::debug!("driver handle dropped; abandoning game");
        if let Err(err) = service.end_game(&mut game).await {
            tracing::warn!(error = %err, "failed to abandon game");
        }
        snapshots.send_replace(game.session().clone());
    }
    tracing::debug!("game driver stopped");
    game
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::repository::{GameResultRepository, Storage};
use trivia_core::model::{GameResult, GameSettings, Lifeline};
use trivia_core::{GameError, GameEvent, Outcome, Session, start_game};

use crate::Clock;
use crate::error::GameServiceError;
use crate::questions::{QuestionLoader, QuestionSource};

/// A running game: the engine session plus the bookkeeping around it.
#[derive(Debug, Clone)]
pub struct GameSession {
    session: Session,
    source: QuestionSource,
    started_at: DateTime<Utc>,
    result_id: Option<i64>,
    record_attempted: bool,
}

impl GameSession {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn source(&self) -> QuestionSource {
        self.source
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Row id of the stored result, once the finished game was recorded.
    #[must_use]
    pub fn result_id(&self) -> Option<i64> {
        self.result_id
    }
}

/// Starts games and applies events to them, recording results when they end.
#[derive(Clone)]
pub struct GameService {
    clock: Clock,
    settings: GameSettings,
    loader: QuestionLoader,
    results: Arc<dyn GameResultRepository>,
}

impl GameService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: GameSettings,
        loader: QuestionLoader,
        results: Arc<dyn GameResultRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            loader,
            results,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, settings: GameSettings) -> Self {
        Self::new(
            clock,
            settings,
            QuestionLoader::new(Arc::clone(&storage.questions)),
            Arc::clone(&storage.results),
        )
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Load questions and start a new game.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Game` if no questions could be loaded at all.
    pub async fn start_game(&self) -> Result<GameSession, GameServiceError> {
        let loaded = self.loader.load(self.settings.question_limit()).await;
        let session = start_game(loaded.questions, &self.settings)?;
        tracing::info!(
            questions = session.questions().len(),
            source = ?loaded.source,
            "game started"
        );
        Ok(GameSession {
            session,
            source: loaded.source,
            started_at: self.clock.now(),
            result_id: None,
            record_attempted: false,
        })
    }

    /// Apply one event to `game`.
    ///
    /// When the event ends the game the result is stored once. A storage
    /// failure at that point is logged and does not fail the event; see
    /// [`GameService::finalize_result`] to retry.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Game` if the engine rejects the event.
    pub async fn apply(
        &self,
        game: &mut GameSession,
        event: GameEvent,
    ) -> Result<Outcome, GameServiceError> {
        let outcome = game.session.apply(event)?;
        if outcome.finished().is_some() && !game.record_attempted {
            game.record_attempted = true;
            match self.record(game).await {
                Ok(id) => game.result_id = Some(id),
                Err(err) => tracing::warn!(error = %err, "failed to record game result"),
            }
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// See [`GameService::apply`].
    pub async fn submit_answer(
        &self,
        game: &mut GameSession,
        index: usize,
    ) -> Result<Outcome, GameServiceError> {
        self.apply(game, GameEvent::SubmitAnswer(index)).await
    }

    /// # Errors
    ///
    /// See [`GameService::apply`].
    pub async fn use_lifeline(
        &self,
        game: &mut GameSession,
        lifeline: Lifeline,
    ) -> Result<Outcome, GameServiceError> {
        self.apply(game, GameEvent::UseLifeline(lifeline)).await
    }

    /// # Errors
    ///
    /// See [`GameService::apply`].
    pub async fn advance(&self, game: &mut GameSession) -> Result<Outcome, GameServiceError> {
        self.apply(game, GameEvent::Advance).await
    }

    /// # Errors
    ///
    /// See [`GameService::apply`].
    pub async fn tick(&self, game: &mut GameSession) -> Result<Outcome, GameServiceError> {
        self.apply(game, GameEvent::Tick).await
    }

    /// # Errors
    ///
    /// See [`GameService::apply`].
    pub async fn end_game(&self, game: &mut GameSession) -> Result<Outcome, GameServiceError> {
        self.apply(game, GameEvent::End).await
    }

    /// Store the result of a finished game if it has not been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Game` if the game is still running and
    /// `GameServiceError::Storage` if persistence fails.
    pub async fn finalize_result(&self, game: &mut GameSession) -> Result<i64, GameServiceError> {
        if let Some(id) = game.result_id {
            return Ok(id);
        }
        let id = self.record(game).await?;
        game.record_attempted = true;
        game.result_id = Some(id);
        Ok(id)
    }

    async fn record(&self, game: &GameSession) -> Result<i64, GameServiceError> {
        let summary = game.session.summary().ok_or(GameError::InvalidTransition {
            action: "record a result",
            phase: game.session.phase(),
        })?;
        let result = GameResult::new(summary, game.started_at, self.clock.now())?;
        let id = self.results.record_game_result(&result).await?;
        tracing::info!(
            result_id = id,
            final_score = summary.final_score,
            questions_answered = summary.questions_answered,
            reason = %summary.reason,
            "game result recorded"
        );
        Ok(id)
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::scoring::{MIN_BASE_POINTS, ScoringPolicy};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("starting lives must be between 1 and 10, got {0}")]
    InvalidStartingLives(u32),

    #[error("seconds per question must be between 5 and 300, got {0}")]
    InvalidSecondsPerQuestion(u32),

    #[error("question limit must be > 0")]
    InvalidQuestionLimit,

    #[error("tick interval must be > 0 ms")]
    InvalidTickInterval,

    #[error("base points must be at least 3, got {0}")]
    InvalidBasePoints(u32),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for a single-player game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSettings {
    starting_lives: u32,
    seconds_per_question: u32,
    question_limit: u32,
    tick_interval_ms: u64,
    scoring: ScoringPolicy,
}

impl Default for GameSettings {
    /// Three lives, 30 seconds per question, ten questions, one tick per second.
    fn default() -> Self {
        Self {
            starting_lives: 3,
            seconds_per_question: 30,
            question_limit: 10,
            tick_interval_ms: 1_000,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl GameSettings {
    /// Creates custom settings with the standard scoring policy.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any value falls outside its allowed range.
    pub fn new(
        starting_lives: u32,
        seconds_per_question: u32,
        question_limit: u32,
        tick_interval_ms: u64,
    ) -> Result<Self, SettingsError> {
        if !(1..=10).contains(&starting_lives) {
            return Err(SettingsError::InvalidStartingLives(starting_lives));
        }
        if !(5..=300).contains(&seconds_per_question) {
            return Err(SettingsError::InvalidSecondsPerQuestion(seconds_per_question));
        }
        if question_limit == 0 {
            return Err(SettingsError::InvalidQuestionLimit);
        }
        if tick_interval_ms == 0 {
            return Err(SettingsError::InvalidTickInterval);
        }

        Ok(Self {
            starting_lives,
            seconds_per_question,
            question_limit,
            tick_interval_ms,
            scoring: ScoringPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    /// Maximum number of questions requested from the question bank.
    #[must_use]
    pub fn question_limit(&self) -> u32 {
        self.question_limit
    }

    /// Real-time period between countdown ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Partially specified settings, e.g. read from a config file.
///
/// Missing fields fall back to `GameSettings::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameSettingsDraft {
    pub starting_lives: Option<u32>,
    pub seconds_per_question: Option<u32>,
    pub question_limit: Option<u32>,
    pub tick_interval_ms: Option<u64>,
    pub base_points: Option<u32>,
    pub time_bonus_per_second: Option<u32>,
}

impl GameSettingsDraft {
    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any provided value is out of range,
    /// including a base below `MIN_BASE_POINTS`.
    pub fn validate(self) -> Result<GameSettings, SettingsError> {
        let defaults = GameSettings::default();
        let base_points = self
            .base_points
            .unwrap_or(defaults.scoring.base_points());
        if base_points < MIN_BASE_POINTS {
            return Err(SettingsError::InvalidBasePoints(base_points));
        }
        let scoring = ScoringPolicy::new(
            base_points,
            self.time_bonus_per_second
                .unwrap_or(defaults.scoring.time_bonus_per_second()),
        );
        Ok(GameSettings::new(
            self.starting_lives.unwrap_or(defaults.starting_lives),
            self.seconds_per_question
                .unwrap_or(defaults.seconds_per_question),
            self.question_limit.unwrap_or(defaults.question_limit),
            self.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
        )?
        .with_scoring(scoring))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,

    #[error("correct answers ({correct}) exceed questions answered ({answered})")]
    CountMismatch { correct: u32, answered: u32 },

    #[error("unknown end reason: {raw}")]
    InvalidEndReason { raw: String },
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every question was played.
    Completed,
    /// The player lost their last life.
    OutOfLives,
    /// The player quit early.
    Abandoned,
}

impl EndReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Completed => "completed",
            EndReason::OutOfLives => "out_of_lives",
            EndReason::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndReason {
    type Err = GameResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(EndReason::Completed),
            "out_of_lives" => Ok(EndReason::OutOfLives),
            "abandoned" => Ok(EndReason::Abandoned),
            _ => Err(GameResultError::InvalidEndReason { raw: s.to_owned() }),
        }
    }
}

/// Final tallies of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_score: u32,
    /// Questions answered or timed out. Skipped questions are not counted.
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub lives_remaining: u32,
    pub reason: EndReason,
}

impl GameSummary {
    /// Share of answered questions that were correct, as a rounded percentage.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.questions_answered == 0 {
            return 0;
        }
        let answered = u64::from(self.questions_answered);
        let pct = (u64::from(self.correct_answers) * 100 + answered / 2) / answered;
        u32::try_from(pct).unwrap_or(100)
    }
}

/// A finished game as handed to the result store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    summary: GameSummary,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl GameResult {
    /// # Errors
    ///
    /// Returns `GameResultError::InvalidTimeRange` if `ended_at` precedes `started_at`
    /// and `GameResultError::CountMismatch` if the tallies are inconsistent.
    pub fn new(
        summary: GameSummary,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if ended_at < started_at {
            return Err(GameResultError::InvalidTimeRange);
        }
        if summary.correct_answers > summary.questions_answered {
            return Err(GameResultError::CountMismatch {
                correct: summary.correct_answers,
                answered: summary.questions_answered,
            });
        }
        Ok(Self {
            summary,
            started_at,
            ended_at,
        })
    }

    #[must_use]
    pub fn summary(&self) -> &GameSummary {
        &self.summary
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.summary.final_score
    }

    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.summary.questions_answered
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn summary(correct: u32, answered: u32) -> GameSummary {
        GameSummary {
            final_score: 0,
            questions_answered: answered,
            correct_answers: correct,
            lives_remaining: 3,
            reason: EndReason::Completed,
        }
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        assert_eq!(summary(0, 0).accuracy_percent(), 0);
        assert_eq!(summary(2, 3).accuracy_percent(), 67);
        assert_eq!(summary(1, 8).accuracy_percent(), 13);
        assert_eq!(summary(5, 5).accuracy_percent(), 100);
    }

    #[test]
    fn result_rejects_backwards_time() {
        let now = fixed_now();
        let err = GameResult::new(summary(1, 1), now, now - chrono::Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, GameResultError::InvalidTimeRange);
    }

    #[test]
    fn result_rejects_more_correct_than_answered() {
        let now = fixed_now();
        let err = GameResult::new(summary(3, 2), now, now).unwrap_err();
        assert!(matches!(err, GameResultError::CountMismatch { .. }));
    }

    #[test]
    fn end_reason_round_trips_through_str() {
        for reason in [EndReason::Completed, EndReason::OutOfLives, EndReason::Abandoned] {
            assert_eq!(reason.as_str().parse::<EndReason>().unwrap(), reason);
        }
    }
}

//! Single-player game session: state, transitions, lifelines and countdown.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::GameError;
use crate::model::{
    EndReason, GameSettings, GameSummary, LifelineSet, LocalizedText, OPTION_COUNT, Question,
    QuestionId,
};

mod clock;
mod engine;
mod lifeline;

pub use engine::{GameEvent, Outcome, start_game, transition};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the session is in its question loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for an answer while the countdown runs.
    Answering,
    /// Showing correctness feedback; the countdown is paused.
    Revealing,
    /// Terminal state.
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Answering => "answering",
            Phase::Revealing => "revealing",
            Phase::Ended => "ended",
        })
    }
}

/// What the player ended up choosing for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Choice(usize),
    /// The countdown hit zero. Never matches the correct option.
    TimedOut,
}

impl Selection {
    #[must_use]
    pub fn choice(self) -> Option<usize> {
        match self {
            Selection::Choice(index) => Some(index),
            Selection::TimedOut => None,
        }
    }
}

/// One evaluated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selection: Selection,
    pub correct: bool,
    pub points: u32,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based position of the current question.
    pub position: usize,
    pub answered: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Complete mutable state of one play-through.
///
/// Only the operations in this module mutate a session. Each one checks its
/// preconditions before touching any field, so a rejected call leaves the
/// session exactly as it was.
#[derive(Clone)]
pub struct Session {
    questions: Arc<[Question]>,
    settings: GameSettings,
    current_index: usize,
    score: u32,
    lives: u32,
    time_remaining: u32,
    selected: Option<Selection>,
    revealed: bool,
    lifelines_used: LifelineSet,
    hidden_options: BTreeSet<usize>,
    active: bool,
    end_reason: Option<EndReason>,
    answers: Vec<AnswerRecord>,
}

impl Session {
    /// Starts a fresh session at the first question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyQuestionSet` if `questions` is empty.
    pub fn start(
        questions: impl Into<Arc<[Question]>>,
        settings: &GameSettings,
    ) -> Result<Self, GameError> {
        let questions = questions.into();
        if questions.is_empty() {
            return Err(GameError::EmptyQuestionSet);
        }

        Ok(Self {
            questions,
            settings: settings.clone(),
            current_index: 0,
            score: 0,
            lives: settings.starting_lives(),
            time_remaining: settings.seconds_per_question(),
            selected: None,
            revealed: false,
            lifelines_used: LifelineSet::new(),
            hidden_options: BTreeSet::new(),
            active: true,
            end_reason: None,
            answers: Vec::new(),
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen. After the game ends this is the last one played.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn selected(&self) -> Option<Selection> {
        self.selected
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn lifelines_used(&self) -> LifelineSet {
        self.lifelines_used
    }

    #[must_use]
    pub fn hidden_options(&self) -> &BTreeSet<usize> {
        &self.hidden_options
    }

    /// Options of the current question still shown to the player.
    pub fn visible_options(&self) -> impl Iterator<Item = (usize, &LocalizedText)> + '_ {
        self.current_question()
            .options()
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.hidden_options.contains(index))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.active {
            Phase::Ended
        } else if self.revealed {
            Phase::Revealing
        } else {
            Phase::Answering
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            position: self.current_index + 1,
            answered: self.answers.len(),
            is_complete: !self.active,
        }
    }

    /// Final tallies, available once the session has ended.
    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        self.end_reason.map(|reason| self.tally(reason))
    }

    fn tally(&self, reason: EndReason) -> GameSummary {
        let correct = self.answers.iter().filter(|a| a.correct).count();
        GameSummary {
            final_score: self.score,
            questions_answered: u32::try_from(self.answers.len()).unwrap_or(u32::MAX),
            correct_answers: u32::try_from(correct).unwrap_or(u32::MAX),
            lives_remaining: self.lives,
            reason,
        }
    }

    pub(crate) fn ensure_active(&self, action: &'static str) -> Result<(), GameError> {
        if self.active {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                action,
                phase: self.phase(),
            })
        }
    }

    pub(crate) fn ensure_selectable(&self, index: usize) -> Result<(), GameError> {
        if index >= OPTION_COUNT || self.hidden_options.contains(&index) {
            return Err(GameError::InvalidOption { index });
        }
        Ok(())
    }

    /// Moves to the next question, resetting per-question state.
    /// Lifeline usage is kept.
    pub(crate) fn move_to_next(&mut self) {
        self.current_index += 1;
        self.time_remaining = self.settings.seconds_per_question();
        self.selected = None;
        self.revealed = false;
        self.hidden_options.clear();
    }

    pub(crate) fn finish(&mut self, reason: EndReason) -> GameSummary {
        self.active = false;
        self.end_reason = Some(reason);
        let summary = self.tally(reason);
        tracing::debug!(
            score = summary.final_score,
            answered = summary.questions_answered,
            %reason,
            "session ended"
        );
        summary
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("questions_len", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("time_remaining", &self.time_remaining)
            .field("selected", &self.selected)
            .field("revealed", &self.revealed)
            .field("lifelines_used", &self.lifelines_used)
            .field("hidden_options", &self.hidden_options)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

//
// ─── TEST FIXTURES ─────────────────────────────────────────────────────────────
//

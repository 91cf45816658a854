use std::sync::Arc;

use crate::error::GameError;
use crate::model::{EndReason, GameSettings, GameSummary, Lifeline, LocalizedText, Question};

use super::{AnswerRecord, Selection, Session};

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Inputs to the session state machine: player actions and timer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SubmitAnswer(usize),
    Tick,
    TimeExpire,
    Advance,
    UseLifeline(Lifeline),
    End,
}

/// What an applied event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answered { correct: bool, points: u32 },
    TimedOut,
    Ticked { remaining: u32 },
    /// The event was a no-op (tick while paused, expiry after reveal, end after end).
    Idle,
    Advanced { index: usize },
    FiftyFifty { hidden: [usize; 2] },
    Hint { text: Option<LocalizedText> },
    Skipped { index: usize },
    Finished(GameSummary),
}

impl Outcome {
    #[must_use]
    pub fn finished(&self) -> Option<&GameSummary> {
        match self {
            Outcome::Finished(summary) => Some(summary),
            _ => None,
        }
    }
}

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

/// Starts a session over `questions`.
///
/// # Errors
///
/// Returns `GameError::EmptyQuestionSet` if `questions` is empty.
pub fn start_game(questions: Vec<Question>, settings: &GameSettings) -> Result<Session, GameError> {
    Session::start(Arc::<[Question]>::from(questions), settings)
}

/// Pure form of `Session::apply`: returns the next state and leaves `session` untouched.
///
/// # Errors
///
/// Propagates the `GameError` of the rejected event.
pub fn transition(session: &Session, event: GameEvent) -> Result<(Session, Outcome), GameError> {
    let mut next = session.clone();
    let outcome = next.apply(event)?;
    Ok((next, outcome))
}

impl Session {
    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns `GameError` when the event is not valid in the current phase;
    /// the session is left unchanged in that case.
    pub fn apply(&mut self, event: GameEvent) -> Result<Outcome, GameError> {
        match event {
            GameEvent::SubmitAnswer(index) => self.submit_answer(index),
            GameEvent::Tick => Ok(self.tick()),
            GameEvent::TimeExpire => Ok(self.time_expire()),
            GameEvent::Advance => self.advance(),
            GameEvent::UseLifeline(lifeline) => self.use_lifeline(lifeline),
            GameEvent::End => Ok(self.end_game()),
        }
    }

    /// Records the player's choice and evaluates it immediately.
    ///
    /// A correct answer adds the scoring policy's points for the time left;
    /// a wrong one costs a life. Either way the question is revealed.
    ///
    /// # Errors
    ///
    /// - `GameError::InvalidTransition` if the session has ended.
    /// - `GameError::AlreadyAnswered` if this question already has a selection.
    /// - `GameError::InvalidOption` if `index` is out of range or hidden.
    pub fn submit_answer(&mut self, index: usize) -> Result<Outcome, GameError> {
        self.ensure_active("submit an answer")?;
        if self.selected.is_some() {
            return Err(GameError::AlreadyAnswered);
        }
        self.ensure_selectable(index)?;

        let question = self.current_question();
        let question_id = question.id();
        let correct = question.is_correct(index);
        let points = if correct {
            self.settings
                .scoring()
                .compute(self.time_remaining, question.difficulty())
        } else {
            0
        };

        let selection = Selection::Choice(index);
        self.selected = Some(selection);
        self.revealed = true;
        if correct {
            self.score = self.score.saturating_add(points);
        } else {
            self.lives = self.lives.saturating_sub(1);
        }
        self.answers.push(AnswerRecord {
            question_id,
            selection,
            correct,
            points,
        });

        tracing::debug!(%question_id, index, correct, points, lives = self.lives, "answer evaluated");
        Ok(Outcome::Answered { correct, points })
    }

    /// Leaves the reveal phase: next question, or the end of the game.
    ///
    /// The game ends here when the last question was played or when the
    /// player has no lives left.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` unless the session is active and
    /// the current question has been revealed.
    pub fn advance(&mut self) -> Result<Outcome, GameError> {
        self.ensure_active("advance")?;
        if !self.revealed {
            return Err(GameError::InvalidTransition {
                action: "advance",
                phase: self.phase(),
            });
        }

        if self.lives == 0 {
            return Ok(Outcome::Finished(self.finish(EndReason::OutOfLives)));
        }
        if self.is_last_question() {
            return Ok(Outcome::Finished(self.finish(EndReason::Completed)));
        }

        self.move_to_next();
        Ok(Outcome::Advanced {
            index: self.current_index,
        })
    }

    /// Ends the game early, keeping the score accumulated so far.
    ///
    /// Calling this on an ended session does nothing.
    pub fn end_game(&mut self) -> Outcome {
        if !self.active {
            return Outcome::Idle;
        }
        Outcome::Finished(self.finish(EndReason::Abandoned))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

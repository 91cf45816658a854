use crate::error::GameError;
use crate::model::{EndReason, Lifeline};

use super::Session;
use super::engine::Outcome;

impl Session {
    /// Spends a lifeline on the current question.
    ///
    /// Lifelines are only usable while the question is unanswered, and each
    /// one only once per game.
    ///
    /// # Errors
    ///
    /// - `GameError::InvalidTransition` if the session has ended.
    /// - `GameError::LifelineAlreadyUsed` if the lifeline was spent earlier.
    /// - `GameError::AlreadyAnswered` if the current question has a selection.
    pub fn use_lifeline(&mut self, lifeline: Lifeline) -> Result<Outcome, GameError> {
        match lifeline {
            Lifeline::FiftyFifty => self.use_fifty_fifty(),
            Lifeline::Hint => self.use_hint(),
            Lifeline::Skip => self.use_skip(),
        }
    }

    /// Hides the first two incorrect options, in option order.
    ///
    /// # Errors
    ///
    /// See [`Session::use_lifeline`].
    pub fn use_fifty_fifty(&mut self) -> Result<Outcome, GameError> {
        self.check_lifeline(Lifeline::FiftyFifty)?;

        // Four options with one correct always leave three incorrect ones.
        let mut hidden = [0; 2];
        for (slot, index) in hidden
            .iter_mut()
            .zip(self.current_question().incorrect_options())
        {
            *slot = index;
        }

        self.hidden_options.extend(hidden);
        self.lifelines_used.insert(Lifeline::FiftyFifty);
        Ok(Outcome::FiftyFifty { hidden })
    }

    /// Marks the hint as used and hands back the question's explanation text.
    ///
    /// # Errors
    ///
    /// See [`Session::use_lifeline`].
    pub fn use_hint(&mut self) -> Result<Outcome, GameError> {
        self.check_lifeline(Lifeline::Hint)?;

        let text = self.current_question().explanation().cloned();
        self.lifelines_used.insert(Lifeline::Hint);
        Ok(Outcome::Hint { text })
    }

    /// Moves past the current question with no score change and no life lost.
    ///
    /// # Errors
    ///
    /// See [`Session::use_lifeline`].
    pub fn use_skip(&mut self) -> Result<Outcome, GameError> {
        self.check_lifeline(Lifeline::Skip)?;

        self.lifelines_used.insert(Lifeline::Skip);
        if self.is_last_question() {
            return Ok(Outcome::Finished(self.finish(EndReason::Completed)));
        }
        self.move_to_next();
        Ok(Outcome::Skipped {
            index: self.current_index,
        })
    }

    fn check_lifeline(&self, lifeline: Lifeline) -> Result<(), GameError> {
        self.ensure_active("use a lifeline")?;
        if self.lifelines_used.contains(lifeline) {
            return Err(GameError::LifelineAlreadyUsed(lifeline));
        }
        if self.selected.is_some() {
            return Err(GameError::AlreadyAnswered);
        }
        Ok(())
    }
}

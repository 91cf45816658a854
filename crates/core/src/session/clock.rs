use super::engine::Outcome;
use super::{AnswerRecord, Selection, Session};

impl Session {
    /// One countdown step.
    ///
    /// Decrements the timer while a question is being answered. When it
    /// reaches zero the question expires in the same step, so expiry fires
    /// exactly once. Ticks during the reveal or after the end are ignored.
    pub fn tick(&mut self) -> Outcome {
        if !self.active || self.revealed {
            return Outcome::Idle;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return self.time_expire();
        }
        Outcome::Ticked {
            remaining: self.time_remaining,
        }
    }

    /// Treats the current question as answered wrongly because time ran out.
    ///
    /// No-op once the question is revealed or the session has ended, which
    /// makes it safe to race against `submit_answer`.
    pub fn time_expire(&mut self) -> Outcome {
        if !self.active || self.revealed {
            return Outcome::Idle;
        }

        let question_id = self.current_question().id();
        self.time_remaining = 0;
        self.selected = Some(Selection::TimedOut);
        self.revealed = true;
        self.lives = self.lives.saturating_sub(1);
        self.answers.push(AnswerRecord {
            question_id,
            selection: Selection::TimedOut,
            correct: false,
            points: 0,
        });

        tracing::debug!(%question_id, lives = self.lives, "question timed out");
        Outcome::TimedOut
    }

    /// Seconds elapsed on the current question.
    #[must_use]
    pub fn time_elapsed(&self) -> u32 {
        self.settings
            .seconds_per_question()
            .saturating_sub(self.time_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::session::Phase;
    use crate::session::fixtures::session;

    #[test]
    fn tick_counts_down_while_answering() {
        let mut s = session(1);
        assert_eq!(s.tick(), Outcome::Ticked { remaining: 29 });
        assert_eq!(s.time_elapsed(), 1);
    }

    #[test]
    fn countdown_to_zero_expires_exactly_once() {
        let mut s = session(2);
        let mut expired = 0;
        for _ in 0..100 {
            if s.tick() == Outcome::TimedOut {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(s.time_remaining(), 0);
        assert_eq!(s.lives(), 2);
        assert_eq!(s.selected(), Some(Selection::TimedOut));
        assert_eq!(s.phase(), Phase::Revealing);
    }

    #[test]
    fn answer_after_timeout_is_rejected() {
        let mut s = session(2);
        s.time_expire();
        assert_eq!(s.submit_answer(1).unwrap_err(), GameError::AlreadyAnswered);
        assert_eq!(s.lives(), 2);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn expiry_after_answer_is_a_no_op() {
        let mut s = session(2);
        s.submit_answer(1).unwrap();
        let score = s.score();
        assert_eq!(s.time_expire(), Outcome::Idle);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.score(), score);
        assert_eq!(s.selected(), Some(Selection::Choice(1)));
    }

    #[test]
    fn clock_pauses_during_reveal_and_resets_on_advance() {
        let mut s = session(2);
        s.tick();
        s.tick();
        s.submit_answer(1).unwrap();
        assert_eq!(s.tick(), Outcome::Idle);
        assert_eq!(s.time_remaining(), 28);

        s.advance().unwrap();
        assert_eq!(s.time_remaining(), 30);
        assert_eq!(s.tick(), Outcome::Ticked { remaining: 29 });
    }

    #[test]
    fn ticks_after_end_are_ignored() {
        let mut s = session(1);
        s.end_game();
        assert_eq!(s.tick(), Outcome::Idle);
        assert_eq!(s.time_expire(), Outcome::Idle);
        assert_eq!(s.lives(), 3);
    }
}

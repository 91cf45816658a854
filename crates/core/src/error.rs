use thiserror::Error;

use crate::model::Lifeline;
use crate::session::Phase;

/// Errors returned by session operations.
///
/// Every variant is recoverable: a rejected operation leaves the session
/// exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("cannot start a game without questions")]
    EmptyQuestionSet,

    #[error("the current question has already been answered")]
    AlreadyAnswered,

    #[error("lifeline {0} has already been used this game")]
    LifelineAlreadyUsed(Lifeline),

    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("option {index} is not selectable")]
    InvalidOption { index: usize },
}

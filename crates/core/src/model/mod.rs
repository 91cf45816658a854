mod ids;
mod lifeline;
mod question;
mod result;
mod settings;

pub use ids::{ParseIdError, QuestionId};
pub use lifeline::{Lifeline, LifelineSet};
pub use question::{
    Difficulty, Locale, LocalizedText, OPTION_COUNT, Question, QuestionDraft, QuestionError,
};
pub use result::{EndReason, GameResult, GameResultError, GameSummary};
pub use settings::{GameSettings, GameSettingsDraft, SettingsError};

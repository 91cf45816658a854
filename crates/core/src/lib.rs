#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod time;

pub use error::GameError;
pub use scoring::ScoringPolicy;
pub use session::{GameEvent, Outcome, Phase, Selection, Session, start_game, transition};
pub use time::Clock;

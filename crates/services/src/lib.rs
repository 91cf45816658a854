#![forbid(unsafe_code)]

pub mod driver;
pub mod error;
pub mod game_service;
pub mod questions;

pub use trivia_core::Clock;

pub use driver::GameDriver;
pub use error::GameServiceError;
pub use game_service::{GameService, GameSession};
pub use questions::{LoadedQuestions, QuestionLoader, QuestionSource};

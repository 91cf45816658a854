//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use trivia_core::GameError;
use trivia_core::model::GameResultError;

/// Errors emitted by `GameService` and `GameDriver`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Result(#[from] GameResultError),
    #[error("game driver has stopped")]
    DriverClosed,
}

#![forbid(unsafe_code)]

pub mod fallback;
pub mod repository;
pub mod sqlite;

pub use fallback::fallback_questions;
pub use repository::{
    GameResultRepository, InMemoryRepository, QuestionBank, QuestionRecord, QuestionRecordError,
    QuestionStore, Storage, StorageError,
};

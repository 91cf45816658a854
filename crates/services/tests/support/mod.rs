#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::OnceCell;
use services::{Clock, GameService};
use storage::fallback::fallback_records;
use storage::repository::{InMemoryRepository, QuestionStore, Storage};
use tracing_subscriber::{EnvFilter, fmt};
use trivia_core::model::GameSettings;
use trivia_core::time::fixed_now;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub async fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for record in fallback_records() {
        repo.upsert_question(&record).await.unwrap();
    }
    repo
}

pub fn service(repo: &InMemoryRepository, settings: GameSettings) -> Arc<GameService> {
    Arc::new(GameService::from_storage(
        &Storage::from_in_memory(repo),
        Clock::fixed(fixed_now()),
        settings,
    ))
}

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use services::{Clock, GameService, QuestionLoader, QuestionSource};
use storage::repository::{GameResultRepository, InMemoryRepository, StorageError};
use trivia_core::model::{EndReason, GameResult, GameSettings, Lifeline};
use trivia_core::time::fixed_now;
use trivia_core::{Outcome, ScoringPolicy};

/// Result store that is always down and counts how often it was asked.
#[derive(Default)]
struct FailingResults {
    attempts: AtomicUsize,
}

#[async_trait]
impl GameResultRepository for FailingResults {
    async fn record_game_result(&self, _result: &GameResult) -> Result<i64, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Connection("results store offline".into()))
    }

    async fn get_game_result(&self, _id: i64) -> Result<GameResult, StorageError> {
        Err(StorageError::NotFound)
    }
}

#[tokio::test]
async fn full_game_against_the_bank() {
    support::init_logging();
    let repo = support::seeded_repo().await;
    let service = support::service(&repo, GameSettings::default());
    let mut game = service.start_game().await.unwrap();
    assert_eq!(game.source(), QuestionSource::Bank);

    let policy = ScoringPolicy::default();
    let mut expected = 0;
    let mut last = Outcome::Idle;
    while game.session().is_active() {
        let question = game.session().current_question().clone();
        for _ in 0..5 {
            service.tick(&mut game).await.unwrap();
        }
        service
            .submit_answer(&mut game, question.correct_option())
            .await
            .unwrap();
        expected += policy.compute(25, question.difficulty());
        last = service.advance(&mut game).await.unwrap();
    }

    let summary = last.finished().copied().unwrap();
    assert_eq!(summary.reason, EndReason::Completed);
    assert_eq!(summary.final_score, expected);
    assert_eq!(summary.correct_answers, 6);
    assert_eq!(summary.accuracy_percent(), 100);

    let stored = repo.get_game_result(game.result_id().unwrap()).await.unwrap();
    assert_eq!(stored.final_score(), expected);
}

#[tokio::test]
async fn offline_bank_still_starts_a_game() {
    support::init_logging();
    let repo = InMemoryRepository::new();
    repo.set_unavailable(true);
    let service = support::service(&repo, GameSettings::default());

    let mut game = service.start_game().await.unwrap();
    assert_eq!(game.source(), QuestionSource::Fallback);
    assert!(game.session().questions().len() >= 5);

    // Storage is still down when the game ends; the end itself succeeds.
    let outcome = service.end_game(&mut game).await.unwrap();
    assert!(outcome.finished().is_some());
    assert!(game.result_id().is_none());
}

#[tokio::test]
async fn skip_and_hint_do_not_touch_score_or_lives() {
    support::init_logging();
    let repo = support::seeded_repo().await;
    let service = support::service(&repo, GameSettings::default());
    let mut game = service.start_game().await.unwrap();

    let Outcome::Hint { text } = service.use_lifeline(&mut game, Lifeline::Hint).await.unwrap()
    else {
        panic!("expected hint");
    };
    assert!(text.unwrap().en.contains("Manama"));

    let outcome = service.use_lifeline(&mut game, Lifeline::Skip).await.unwrap();
    assert_eq!(outcome, Outcome::Skipped { index: 1 });
    assert_eq!(game.session().score(), 0);
    assert_eq!(game.session().lives(), 3);
    assert_eq!(game.session().lifelines_used().len(), 2);
}

#[tokio::test]
async fn failed_recording_is_attempted_once_and_not_surfaced() {
    support::init_logging();
    let repo = support::seeded_repo().await;
    let results = Arc::new(FailingResults::default());
    let service = GameService::new(
        Clock::fixed(fixed_now()),
        GameSettings::default(),
        QuestionLoader::new(Arc::new(repo)),
        Arc::clone(&results) as Arc<dyn GameResultRepository>,
    );
    let mut game = service.start_game().await.unwrap();

    let correct = game.session().current_question().correct_option();
    service.submit_answer(&mut game, correct).await.unwrap();
    let outcome = service.end_game(&mut game).await.unwrap();
    assert_eq!(outcome.finished().unwrap().reason, EndReason::Abandoned);
    assert_eq!(service.end_game(&mut game).await.unwrap(), Outcome::Idle);

    assert!(game.result_id().is_none());
    assert_eq!(results.attempts.load(Ordering::SeqCst), 1);

    assert!(service.finalize_result(&mut game).await.is_err());
    assert_eq!(results.attempts.load(Ordering::SeqCst), 2);
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use trivia_core::model::{
    GameResult, LocalizedText, Question, QuestionDraft, QuestionError, QuestionId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionRecordError {
    #[error("invalid question id: {0}")]
    InvalidId(i64),

    #[error("unknown difficulty {raw:?} on question {id}")]
    InvalidDifficulty { id: i64, raw: String },

    #[error("{field} {value} does not fit a question row")]
    OutOfRange { field: &'static str, value: u64 },

    #[error("question {id}: {source}")]
    Invalid {
        id: i64,
        #[source]
        source: QuestionError,
    },
}

/// Row shape of the `questions` table as the hosted question bank returns it.
///
/// Option lists and the correct index arrive untyped; `into_question` is the
/// single place they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub question: String,
    pub question_ar: String,
    pub options: Vec<String>,
    pub options_ar: Vec<String>,
    pub correct_answer: i64,
    pub category: String,
    pub difficulty: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub explanation_ar: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl QuestionRecord {
    /// Row form of a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionRecordError::OutOfRange` if the id does not fit the
    /// signed row id.
    pub fn from_question(question: &Question) -> Result<Self, QuestionRecordError> {
        let id = question.id().value();
        let id = i64::try_from(id).map_err(|_| QuestionRecordError::OutOfRange {
            field: "id",
            value: id,
        })?;
        let correct = question.correct_option();
        let correct_answer =
            i64::try_from(correct).map_err(|_| QuestionRecordError::OutOfRange {
                field: "correct_answer",
                value: u64::try_from(correct).unwrap_or(u64::MAX),
            })?;
        let explanation = question.explanation();
        Ok(Self {
            id,
            question: question.prompt().en.clone(),
            question_ar: question.prompt().ar.clone(),
            options: question.options().iter().map(|o| o.en.clone()).collect(),
            options_ar: question.options().iter().map(|o| o.ar.clone()).collect(),
            correct_answer,
            category: question.category().to_owned(),
            difficulty: question.difficulty().as_str().to_owned(),
            explanation: explanation.map(|e| e.en.clone()),
            explanation_ar: explanation.map(|e| e.ar.clone()),
            is_active: true,
        })
    }

    /// Validate the record into a domain `Question`.
    ///
    /// An explanation present in only one locale is reused for the other.
    ///
    /// # Errors
    ///
    /// Returns `QuestionRecordError` if the id is negative, the difficulty is
    /// unknown, or the question invariants do not hold.
    pub fn into_question(self) -> Result<Question, QuestionRecordError> {
        let id = self.id;
        let question_id = u64::try_from(id)
            .map(QuestionId::new)
            .map_err(|_| QuestionRecordError::InvalidId(id))?;
        let difficulty =
            self.difficulty
                .parse()
                .map_err(|_| QuestionRecordError::InvalidDifficulty {
                    id,
                    raw: self.difficulty.clone(),
                })?;

        let explanation = match (
            normalize_optional(self.explanation),
            normalize_optional(self.explanation_ar),
        ) {
            (Some(en), Some(ar)) => Some(LocalizedText::new(en, ar)),
            (Some(en), None) => Some(LocalizedText::new(en.clone(), en)),
            (None, Some(ar)) => Some(LocalizedText::new(ar.clone(), ar)),
            (None, None) => None,
        };

        QuestionDraft {
            id: question_id,
            prompt: LocalizedText::new(self.question, self.question_ar),
            options_en: self.options,
            options_ar: self.options_ar,
            correct_option: self.correct_answer,
            category: self.category,
            difficulty,
            explanation,
        }
        .validate()
        .map_err(|source| QuestionRecordError::Invalid { id, source })
    }
}

/// Convert records into questions, dropping (and logging) invalid ones.
pub(crate) fn ingest(records: impl IntoIterator<Item = QuestionRecord>, limit: u32) -> Vec<Question> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    records
        .into_iter()
        .filter_map(|record| match record.into_question() {
            Ok(question) => Some(question),
            Err(err) => {
                tracing::warn!(error = %err, "skipping invalid question record");
                None
            }
        })
        .take(limit)
        .collect()
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Source of questions for new games.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch up to `limit` active questions, in bank order.
    ///
    /// Rows that fail validation are skipped rather than failing the fetch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be reached.
    async fn fetch_active_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError>;
}

/// Write access to the question table.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Insert or replace a question row by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError>;
}

/// Write target for finished games.
#[async_trait]
pub trait GameResultRepository: Send + Sync {
    /// Append a finished game and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn record_game_result(&self, result: &GameResult) -> Result<i64, StorageError>;

    /// Fetch a stored result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_game_result(&self, id: i64) -> Result<GameResult, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
///
/// `set_unavailable(true)` makes every call fail with a connection error,
/// which is how tests simulate the hosted bank being offline.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<i64, QuestionRecord>>>,
    results: Arc<Mutex<Vec<GameResult>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored game results.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn result_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("repository unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionBank for InMemoryRepository {
    async fn fetch_active_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError> {
        self.check_available()?;
        let records: Vec<QuestionRecord> = {
            let guard = self
                .questions
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.values().filter(|r| r.is_active).cloned().collect()
        };
        Ok(ingest(records, limit))
    }
}

#[async_trait]
impl QuestionStore for InMemoryRepository {
    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError> {
        self.check_available()?;
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.id, record.clone());
        Ok(())
    }
}

#[async_trait]
impl GameResultRepository for InMemoryRepository {
    async fn record_game_result(&self, result: &GameResult) -> Result<i64, StorageError> {
        self.check_available()?;
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(result.clone());
        i64::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn get_game_result(&self, id: i64) -> Result<GameResult, StorageError> {
        self.check_available()?;
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| guard.get(index))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Bundle of repositories handed to the services layer.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionBank>,
    pub question_store: Arc<dyn QuestionStore>,
    pub results: Arc<dyn GameResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        Self {
            questions: Arc::new(repo.clone()),
            question_store: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::model::{Difficulty, EndReason, GameSummary};
    use trivia_core::time::fixed_now;

    fn record(id: i64) -> QuestionRecord {
        QuestionRecord {
            id,
            question: format!("Question {id}"),
            question_ar: format!("سؤال {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            options_ar: vec!["أ".into(), "ب".into(), "ج".into(), "د".into()],
            correct_answer: 2,
            category: "Science".into(),
            difficulty: "medium".into(),
            explanation: Some("because".into()),
            explanation_ar: None,
            is_active: true,
        }
    }

    #[test]
    fn record_converts_and_fills_missing_locale() {
        let question = record(7).into_question().unwrap();
        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.difficulty(), Difficulty::Medium);
        assert_eq!(question.correct_option(), 2);
        let explanation = question.explanation().unwrap();
        assert_eq!(explanation.ar, "because");
    }

    #[test]
    fn record_rejects_out_of_range_answer() {
        let mut r = record(1);
        r.correct_answer = 9;
        assert!(matches!(
            r.into_question(),
            Err(QuestionRecordError::Invalid {
                id: 1,
                source: QuestionError::CorrectOptionOutOfRange { index: 9 }
            })
        ));
    }

    #[test]
    fn record_rejects_unknown_difficulty_and_negative_id() {
        let mut r = record(1);
        r.difficulty = "legendary".into();
        assert!(matches!(
            r.into_question(),
            Err(QuestionRecordError::InvalidDifficulty { .. })
        ));
        assert_eq!(
            record(-3).into_question().unwrap_err(),
            QuestionRecordError::InvalidId(-3)
        );
    }

    #[test]
    fn record_parses_hosted_json_row() {
        let json = r#"{
            "id": 5,
            "question": "What is the chemical symbol for gold?",
            "question_ar": "ما هو الرمز الكيميائي للذهب؟",
            "options": ["Go", "Gd", "Au", "Ag"],
            "options_ar": ["Go", "Gd", "Au", "Ag"],
            "correct_answer": 2,
            "category": "Science",
            "difficulty": "medium"
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_active);
        let question = record.into_question().unwrap();
        assert!(question.is_correct(2));
        assert!(question.explanation().is_none());
    }

    #[test]
    fn from_question_round_trips_and_rejects_oversized_id() {
        let question = record(9).into_question().unwrap();
        let back = QuestionRecord::from_question(&question).unwrap();
        assert_eq!(back.id, 9);
        assert_eq!(back.correct_answer, 2);
        assert_eq!(back.explanation_ar.as_deref(), Some("because"));

        let huge = QuestionDraft {
            id: QuestionId::new(u64::MAX),
            prompt: question.prompt().clone(),
            options_en: question.options().iter().map(|o| o.en.clone()).collect(),
            options_ar: question.options().iter().map(|o| o.ar.clone()).collect(),
            correct_option: 0,
            category: "Science".into(),
            difficulty: Difficulty::Easy,
            explanation: None,
        }
        .validate()
        .unwrap();
        assert_eq!(
            QuestionRecord::from_question(&huge).unwrap_err(),
            QuestionRecordError::OutOfRange {
                field: "id",
                value: u64::MAX
            }
        );
    }

    #[test]
    fn ingest_skips_invalid_and_honours_limit() {
        let mut broken = record(2);
        broken.options.pop();
        let questions = ingest(vec![record(1), broken, record(3), record(4)], 2);
        let ids: Vec<_> = questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn in_memory_fetch_filters_inactive_and_fails_when_unavailable() {
        let repo = InMemoryRepository::new();
        let mut hidden = record(2);
        hidden.is_active = false;
        for r in [record(1), hidden, record(3)] {
            repo.upsert_question(&r).await.unwrap();
        }

        let fetched = repo.fetch_active_questions(10).await.unwrap();
        assert_eq!(fetched.len(), 2);

        repo.set_unavailable(true);
        assert!(matches!(
            repo.fetch_active_questions(10).await,
            Err(StorageError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn in_memory_results_round_trip() {
        let repo = InMemoryRepository::new();
        let summary = GameSummary {
            final_score: 360,
            questions_answered: 3,
            correct_answers: 3,
            lives_remaining: 3,
            reason: EndReason::Completed,
        };
        let result = GameResult::new(summary, fixed_now(), fixed_now()).unwrap();
        let id = repo.record_game_result(&result).await.unwrap();

        assert_eq!(repo.get_game_result(id).await.unwrap(), result);
        assert!(matches!(
            repo.get_game_result(id + 1).await,
            Err(StorageError::NotFound)
        ));
        assert_eq!(repo.result_count().unwrap(), 1);
    }
}

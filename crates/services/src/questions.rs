use std::sync::Arc;

use storage::fallback_questions;
use storage::repository::QuestionBank;
use trivia_core::model::Question;

/// Where a loaded question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    Bank,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub source: QuestionSource,
}

/// Loads the question set for a new game, falling back to the bundled set.
#[derive(Clone)]
pub struct QuestionLoader {
    bank: Arc<dyn QuestionBank>,
}

impl QuestionLoader {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self { bank }
    }

    /// Fetch up to `limit` questions from the bank.
    ///
    /// A bank error or an empty result is replaced by the whole bundled
    /// set, which is never truncated. The result is never empty.
    pub async fn load(&self, limit: u32) -> LoadedQuestions {
        match self.bank.fetch_active_questions(limit).await {
            Ok(questions) if !questions.is_empty() => {
                tracing::debug!(count = questions.len(), "loaded questions from bank");
                LoadedQuestions {
                    questions,
                    source: QuestionSource::Bank,
                }
            }
            Ok(_) => {
                tracing::warn!("question bank returned no usable questions; using fallback set");
                Self::fallback()
            }
            Err(err) => {
                tracing::warn!(error = %err, "question bank unavailable; using fallback set");
                Self::fallback()
            }
        }
    }

    fn fallback() -> LoadedQuestions {
        LoadedQuestions {
            questions: fallback_questions(),
            source: QuestionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::fallback::fallback_records;
    use storage::repository::{InMemoryRepository, QuestionStore};

    #[tokio::test]
    async fn bank_questions_are_used_and_limited() {
        let repo = InMemoryRepository::new();
        for record in fallback_records() {
            repo.upsert_question(&record).await.unwrap();
        }
        let loader = QuestionLoader::new(Arc::new(repo));

        let loaded = loader.load(2).await;
        assert_eq!(loaded.source, QuestionSource::Bank);
        assert_eq!(loaded.questions.len(), 2);
    }

    #[tokio::test]
    async fn empty_bank_uses_full_fallback_set() {
        let loader = QuestionLoader::new(Arc::new(InMemoryRepository::new()));

        let loaded = loader.load(2).await;
        assert_eq!(loaded.source, QuestionSource::Fallback);
        assert_eq!(loaded.questions.len(), fallback_questions().len());
    }

    #[tokio::test]
    async fn unavailable_bank_uses_fallback_set() {
        let repo = InMemoryRepository::new();
        repo.set_unavailable(true);
        let loader = QuestionLoader::new(Arc::new(repo));

        let loaded = loader.load(10).await;
        assert_eq!(loaded.source, QuestionSource::Fallback);
        assert!(loaded.questions.len() >= 5);
    }

    #[tokio::test]
    async fn bank_of_only_invalid_rows_counts_as_empty() {
        let repo = InMemoryRepository::new();
        let mut broken = fallback_records().remove(0);
        broken.options_ar.clear();
        repo.upsert_question(&broken).await.unwrap();

        let loaded = QuestionLoader::new(Arc::new(repo)).load(10).await;
        assert_eq!(loaded.source, QuestionSource::Fallback);
    }
}

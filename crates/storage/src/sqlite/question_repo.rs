use sqlx::Row;
use trivia_core::model::Question;

use super::{SqliteRepository, conn, ser};
use crate::repository::{QuestionBank, QuestionRecord, QuestionStore, StorageError, ingest};

fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuestionRecord, StorageError> {
    let options: String = row.try_get("options").map_err(ser)?;
    let options_ar: String = row.try_get("options_ar").map_err(ser)?;

    Ok(QuestionRecord {
        id: row.try_get("id").map_err(ser)?,
        question: row.try_get("question").map_err(ser)?,
        question_ar: row.try_get("question_ar").map_err(ser)?,
        options: serde_json::from_str(&options).map_err(ser)?,
        options_ar: serde_json::from_str(&options_ar).map_err(ser)?,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        category: row.try_get("category").map_err(ser)?,
        difficulty: row.try_get("difficulty").map_err(ser)?,
        explanation: row.try_get("explanation").map_err(ser)?,
        explanation_ar: row.try_get("explanation_ar").map_err(ser)?,
        is_active: row.try_get("is_active").map_err(ser)?,
    })
}

#[async_trait::async_trait]
impl QuestionBank for SqliteRepository {
    async fn fetch_active_questions(&self, limit: u32) -> Result<Vec<Question>, StorageError> {
        // Invalid rows are dropped after the fetch, so read every active row
        // and let `ingest` apply the limit.
        let rows = sqlx::query(
            r"
                SELECT id, question, question_ar, options, options_ar, correct_answer,
                       category, difficulty, explanation, explanation_ar, is_active
                FROM questions
                WHERE is_active = 1
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match map_question_row(row) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable question row"),
            }
        }
        Ok(ingest(records, limit))
    }
}

#[async_trait::async_trait]
impl QuestionStore for SqliteRepository {
    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError> {
        let options = serde_json::to_string(&record.options).map_err(ser)?;
        let options_ar = serde_json::to_string(&record.options_ar).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO questions (
                    id, question, question_ar, options, options_ar, correct_answer,
                    category, difficulty, explanation, explanation_ar, is_active
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(id) DO UPDATE SET
                    question = excluded.question,
                    question_ar = excluded.question_ar,
                    options = excluded.options,
                    options_ar = excluded.options_ar,
                    correct_answer = excluded.correct_answer,
                    category = excluded.category,
                    difficulty = excluded.difficulty,
                    explanation = excluded.explanation,
                    explanation_ar = excluded.explanation_ar,
                    is_active = excluded.is_active
            ",
        )
        .bind(record.id)
        .bind(&record.question)
        .bind(&record.question_ar)
        .bind(options)
        .bind(options_ar)
        .bind(record.correct_answer)
        .bind(&record.category)
        .bind(&record.difficulty)
        .bind(&record.explanation)
        .bind(&record.explanation_ar)
        .bind(record.is_active)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}

use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Applies pending schema versions in order, recording each in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: question bank and finished games.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    id INTEGER PRIMARY KEY,
                    question TEXT NOT NULL,
                    question_ar TEXT NOT NULL,
                    options TEXT NOT NULL,
                    options_ar TEXT NOT NULL,
                    correct_answer INTEGER NOT NULL,
                    category TEXT NOT NULL,
                    difficulty TEXT NOT NULL,
                    explanation TEXT,
                    explanation_ar TEXT,
                    is_active INTEGER NOT NULL DEFAULT 1
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS game_results (
                    id INTEGER PRIMARY KEY,
                    final_score INTEGER NOT NULL CHECK (final_score >= 0),
                    questions_answered INTEGER NOT NULL CHECK (questions_answered >= 0),
                    correct_answers INTEGER NOT NULL CHECK (correct_answers >= 0),
                    lives_remaining INTEGER NOT NULL CHECK (lives_remaining >= 0),
                    end_reason TEXT NOT NULL,
                    started_at TEXT NOT NULL,
                    ended_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_active
                    ON questions (is_active, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}

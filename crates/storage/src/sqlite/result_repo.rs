use sqlx::Row;
use trivia_core::model::{EndReason, GameResult, GameSummary};

use super::{SqliteRepository, conn, ser, u32_from_i64};
use crate::repository::{GameResultRepository, StorageError};

fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<GameResult, StorageError> {
    let reason: String = row.try_get("end_reason").map_err(ser)?;
    let summary = GameSummary {
        final_score: u32_from_i64("final_score", row.try_get("final_score").map_err(ser)?)?,
        questions_answered: u32_from_i64(
            "questions_answered",
            row.try_get("questions_answered").map_err(ser)?,
        )?,
        correct_answers: u32_from_i64(
            "correct_answers",
            row.try_get("correct_answers").map_err(ser)?,
        )?,
        lives_remaining: u32_from_i64(
            "lives_remaining",
            row.try_get("lives_remaining").map_err(ser)?,
        )?,
        reason: reason.parse::<EndReason>().map_err(ser)?,
    };
    let started_at = row.try_get("started_at").map_err(ser)?;
    let ended_at = row.try_get("ended_at").map_err(ser)?;

    GameResult::new(summary, started_at, ended_at).map_err(ser)
}

#[async_trait::async_trait]
impl GameResultRepository for SqliteRepository {
    async fn record_game_result(&self, result: &GameResult) -> Result<i64, StorageError> {
        let summary = result.summary();
        let res = sqlx::query(
            r"
                INSERT INTO game_results (
                    final_score, questions_answered, correct_answers,
                    lives_remaining, end_reason, started_at, ended_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(i64::from(summary.final_score))
        .bind(i64::from(summary.questions_answered))
        .bind(i64::from(summary.correct_answers))
        .bind(i64::from(summary.lives_remaining))
        .bind(summary.reason.as_str())
        .bind(result.started_at())
        .bind(result.ended_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn get_game_result(&self, id: i64) -> Result<GameResult, StorageError> {
        let row = sqlx::query(
            r"
                SELECT final_score, questions_answered, correct_answers,
                       lives_remaining, end_reason, started_at, ended_at
                FROM game_results
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref()
            .map(map_result_row)
            .transpose()?
            .ok_or(StorageError::NotFound)
    }
}

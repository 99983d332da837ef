use exam_core::model::{AnswerLedger, ExamResult, ResultId, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    category_id_from_i64, conn, exam_id_from_i64, id_i64, id_u64, ser, u32_from_i64,
    user_id_from_i64,
};
use crate::repository::{ResultRepository, StorageError};

fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ExamResult, StorageError> {
    let user_id = user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?;
    let user_email: String = row.try_get("user_email").map_err(ser)?;
    let exam_id = exam_id_from_i64(row.try_get::<i64, _>("exam_id").map_err(ser)?)?;
    let exam_title: String = row.try_get("exam_title").map_err(ser)?;
    let category_id = category_id_from_i64(row.try_get::<i64, _>("category_id").map_err(ser)?)?;
    let category_name: String = row.try_get("category_name").map_err(ser)?;
    let score: f64 = row.try_get("score").map_err(ser)?;
    let max_score: f64 = row.try_get("max_score").map_err(ser)?;
    let correct_count = u32_from_i64(
        "correct_count",
        row.try_get::<i64, _>("correct_count").map_err(ser)?,
    )?;
    let incorrect_count = u32_from_i64(
        "incorrect_count",
        row.try_get::<i64, _>("incorrect_count").map_err(ser)?,
    )?;
    let percentage: f64 = row.try_get("percentage").map_err(ser)?;
    let submitted_at = row.try_get("submitted_at").map_err(ser)?;
    let answers_json: Option<String> = row.try_get("answers").map_err(ser)?;
    let answers: Option<AnswerLedger> = answers_json
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(ser)?;

    ExamResult::from_persisted(
        score,
        max_score,
        correct_count,
        incorrect_count,
        percentage,
        user_id,
        user_email,
        exam_id,
        exam_title,
        category_id,
        category_name,
        submitted_at,
        answers,
    )
    .map_err(ser)
}

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError> {
        let user_id = id_i64("user_id", result.user_id().value())?;
        let exam_id = id_i64("exam_id", result.exam_id().value())?;
        let category_id = id_i64("category_id", result.category_id().value())?;
        let answers = result
            .answers()
            .map(serde_json::to_string)
            .transpose()
            .map_err(ser)?;

        let res = sqlx::query(
            r"
                INSERT INTO results (
                    user_id, user_email, exam_id, exam_title,
                    category_id, category_name, score, max_score,
                    correct_count, incorrect_count, percentage,
                    submitted_at, answers
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
        )
        .bind(user_id)
        .bind(result.user_email())
        .bind(exam_id)
        .bind(result.exam_title())
        .bind(category_id)
        .bind(result.category_name())
        .bind(result.score())
        .bind(result.max_score())
        .bind(i64::from(result.correct_count()))
        .bind(i64::from(result.incorrect_count()))
        .bind(result.percentage())
        .bind(result.submitted_at())
        .bind(answers)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(ResultId::new(id_u64("result_id", res.last_insert_rowid())?))
    }

    async fn list_results_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExamResult>, StorageError> {
        let user = id_i64("user_id", user_id.value())?;
        let rows = sqlx::query(
            r"
                SELECT
                    user_id, user_email, exam_id, exam_title,
                    category_id, category_name, score, max_score,
                    correct_count, incorrect_count, percentage,
                    submitted_at, answers
                FROM results
                WHERE user_id = ?1
                ORDER BY submitted_at DESC
            ",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_result_row).collect()
    }
}

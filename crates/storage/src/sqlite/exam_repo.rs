use exam_core::model::{Exam, ExamId, Question};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{category_id_from_i64, conn, exam_id_from_i64, id_i64, ser, u32_from_i64};
use crate::repository::{ExamRepository, StorageError};

fn map_exam_row(row: &sqlx::sqlite::SqliteRow) -> Result<Exam, StorageError> {
    let id = exam_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let title: String = row.try_get("title").map_err(ser)?;
    let category_id = category_id_from_i64(row.try_get::<i64, _>("category_id").map_err(ser)?)?;
    let category_name: String = row.try_get("category_name").map_err(ser)?;
    let duration_minutes = u32_from_i64(
        "duration_minutes",
        row.try_get::<i64, _>("duration_minutes").map_err(ser)?,
    )?;
    let marks_per_question: f64 = row.try_get("marks_per_question").map_err(ser)?;
    let negative_marking: f64 = row.try_get("negative_marking").map_err(ser)?;
    let questions_json: String = row.try_get("questions").map_err(ser)?;
    let questions: Vec<Question> = serde_json::from_str(&questions_json).map_err(ser)?;

    Exam::new(
        id,
        title,
        category_id,
        category_name,
        questions,
        duration_minutes,
        marks_per_question,
        negative_marking,
    )
    .map_err(ser)
}

#[async_trait::async_trait]
impl ExamRepository for SqliteRepository {
    async fn upsert_exam(&self, exam: &Exam) -> Result<(), StorageError> {
        let id = id_i64("exam_id", exam.id().value())?;
        let category_id = id_i64("category_id", exam.category_id().value())?;
        let questions = serde_json::to_string(exam.questions()).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO exams (
                    id, title, category_id, category_name,
                    duration_minutes, marks_per_question, negative_marking, questions
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    category_id = excluded.category_id,
                    category_name = excluded.category_name,
                    duration_minutes = excluded.duration_minutes,
                    marks_per_question = excluded.marks_per_question,
                    negative_marking = excluded.negative_marking,
                    questions = excluded.questions
            ",
        )
        .bind(id)
        .bind(exam.title())
        .bind(category_id)
        .bind(exam.category_name())
        .bind(i64::from(exam.duration_minutes()))
        .bind(exam.marks_per_question())
        .bind(exam.negative_marking())
        .bind(questions)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_exam(&self, id: ExamId) -> Result<Option<Exam>, StorageError> {
        let exam_id = id_i64("exam_id", id.value())?;
        let row = sqlx::query(
            r"
                SELECT
                    id, title, category_id, category_name,
                    duration_minutes, marks_per_question, negative_marking, questions
                FROM exams
                WHERE id = ?1
            ",
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_exam_row).transpose()
    }

    async fn list_exams(&self, limit: u32) -> Result<Vec<Exam>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, title, category_id, category_name,
                    duration_minutes, marks_per_question, negative_marking, questions
                FROM exams
                ORDER BY id
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_exam_row).collect()
    }
}

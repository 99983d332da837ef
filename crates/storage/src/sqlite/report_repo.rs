use exam_core::model::ReportId;

use super::SqliteRepository;
use super::mapping::{conn, id_i64, id_u64};
use crate::repository::{QuestionReport, ReportRepository, StorageError};

#[async_trait::async_trait]
impl ReportRepository for SqliteRepository {
    async fn submit_report(&self, report: &QuestionReport) -> Result<ReportId, StorageError> {
        let exam_id = id_i64("exam_id", report.exam_id.value())?;
        let user_id = id_i64("user_id", report.user_id.value())?;
        let question_index = i64::try_from(report.question_index)
            .map_err(|_| StorageError::Serialization("question_index overflow".into()))?;

        let res = sqlx::query(
            r"
                INSERT INTO question_reports (
                    exam_id, exam_title, question_index, question_prompt,
                    user_id, user_email, message, reported_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(exam_id)
        .bind(&report.exam_title)
        .bind(question_index)
        .bind(&report.question_prompt)
        .bind(user_id)
        .bind(&report.user_email)
        .bind(&report.message)
        .bind(report.reported_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(ReportId::new(id_u64("report_id", res.last_insert_rowid())?))
    }
}

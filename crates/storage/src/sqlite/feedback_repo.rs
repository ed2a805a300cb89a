use attendance_core::model::{Feedback, FeedbackId, FeedbackStatus, UserId};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    categories_to_json, db_err, feedback_id_from_i64, id_i64, map_feedback_row, ser, u32_from_i64,
};
use crate::repository::{FeedbackRepository, NewFeedbackRecord, StorageError};

const FEEDBACK_COLUMNS: &str = "id, user_id, kind, subject, description, categories, priority, \
     status, platform, app_version, created_at, updated_at";

#[async_trait::async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn insert_feedback(
        &self,
        feedback: NewFeedbackRecord,
    ) -> Result<FeedbackId, StorageError> {
        let categories = categories_to_json(&feedback.categories)?;
        let res = sqlx::query(
            r"
            INSERT INTO feedback (
                user_id, kind, subject, description, categories, priority,
                status, platform, app_version, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            ",
        )
        .bind(id_i64("user_id", feedback.user_id.value())?)
        .bind(feedback.kind.label())
        .bind(feedback.subject)
        .bind(feedback.description)
        .bind(categories)
        .bind(feedback.priority.label())
        .bind(FeedbackStatus::Pending.label())
        .bind(feedback.platform)
        .bind(feedback.app_version)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        feedback_id_from_i64(res.last_insert_rowid())
    }

    async fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StorageError> {
        let sql = format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_i64("feedback_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => map_feedback_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_feedback(&self, user: UserId) -> Result<Vec<Feedback>, StorageError> {
        let sql = format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE user_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_feedback_row).collect()
    }

    async fn count_since(&self, user: UserId, since: DateTime<Utc>) -> Result<u32, StorageError> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS n FROM feedback
            WHERE user_id = ?1 AND created_at >= ?2
            ",
        )
        .bind(id_i64("user_id", user.value())?)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        u32_from_i64("count", row.try_get::<i64, _>("n").map_err(ser)?)
    }

    async fn update_status(
        &self,
        id: FeedbackId,
        status: FeedbackStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Feedback, StorageError> {
        let res = sqlx::query("UPDATE feedback SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id_i64("feedback_id", id.value())?)
            .bind(status.label())
            .bind(updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        self.get_feedback(id).await
    }
}

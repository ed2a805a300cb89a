use attendance_core::model::{AttendanceRecord, AttendanceStatus, CourseId, RecordId, UserId};
use chrono::NaiveDate;
use sqlx::{Sqlite, Transaction};

use super::SqliteRepository;
use super::course_repo::{course_in_tx, store_counters_in_tx};
use super::mapping::{db_err, id_i64, map_record_row, record_id_from_i64, ser};
use crate::repository::{AttendanceRepository, BulkMark, StorageError};

const RECORD_COLUMNS: &str = "id, user_id, course_id, date, status, note, created_at";

async fn record_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user: UserId,
    id: RecordId,
) -> Result<AttendanceRecord, StorageError> {
    let sql =
        format!("SELECT {RECORD_COLUMNS} FROM attendance_records WHERE id = ?1 AND user_id = ?2");
    let row = sqlx::query(&sql)
        .bind(id_i64("record_id", id.value())?)
        .bind(id_i64("user_id", user.value())?)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_err)?;
    match row {
        Some(row) => map_record_row(&row),
        None => Err(StorageError::NotFound),
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for SqliteRepository {
    async fn mark_bulk(&self, mark: &BulkMark) -> Result<Vec<AttendanceRecord>, StorageError> {
        let user_id = id_i64("user_id", mark.user_id.value())?;
        // Dropping the transaction on any early return rolls everything back.
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut created = Vec::with_capacity(mark.course_ids.len());

        for &course_id in &mark.course_ids {
            let mut course = course_in_tx(&mut tx, mark.user_id, course_id).await?;

            let res = sqlx::query(
                r"
                INSERT INTO attendance_records (user_id, course_id, date, status, note, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(user_id)
            .bind(id_i64("course_id", course_id.value())?)
            .bind(mark.date)
            .bind(mark.status.as_str())
            .bind(mark.note.as_deref())
            .bind(mark.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            course.record_class(mark.status).map_err(ser)?;
            store_counters_in_tx(&mut tx, &course).await?;

            created.push(AttendanceRecord {
                id: record_id_from_i64(res.last_insert_rowid())?,
                user_id: mark.user_id,
                course_id,
                date: mark.date,
                status: mark.status,
                note: mark.note.clone(),
                created_at: mark.created_at,
            });
        }

        tx.commit().await.map_err(db_err)?;
        tracing::debug!(count = created.len(), date = %mark.date, "bulk attendance stored");
        Ok(created)
    }

    async fn list_records(
        &self,
        user: UserId,
        course: Option<CourseId>,
    ) -> Result<Vec<AttendanceRecord>, StorageError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM attendance_records \
             WHERE user_id = ?1 AND (?2 IS NULL OR course_id = ?2) \
             ORDER BY date DESC, id DESC"
        );
        let course_id = course
            .map(|c| id_i64("course_id", c.value()))
            .transpose()?;
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user.value())?)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_record_row).collect()
    }

    async fn records_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StorageError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM attendance_records \
             WHERE user_id = ?1 AND date = ?2 ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("user_id", user.value())?)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(map_record_row).collect()
    }

    async fn update_record(
        &self,
        user: UserId,
        id: RecordId,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<AttendanceRecord, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let previous = record_in_tx(&mut tx, user, id).await?;

        sqlx::query("UPDATE attendance_records SET status = ?2, note = ?3 WHERE id = ?1")
            .bind(id_i64("record_id", id.value())?)
            .bind(status.as_str())
            .bind(note.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let mut course = course_in_tx(&mut tx, user, previous.course_id).await?;
        course.change_recorded_status(previous.status, status);
        store_counters_in_tx(&mut tx, &course).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(AttendanceRecord {
            status,
            note,
            ..previous
        })
    }

    async fn delete_record(&self, user: UserId, id: RecordId) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let record = record_in_tx(&mut tx, user, id).await?;

        sqlx::query("DELETE FROM attendance_records WHERE id = ?1")
            .bind(id_i64("record_id", id.value())?)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let mut course = course_in_tx(&mut tx, user, record.course_id).await?;
        course.unrecord_class(record.status);
        store_counters_in_tx(&mut tx, &course).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}

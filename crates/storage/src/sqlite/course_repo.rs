use attendance_core::model::{Course, CourseId, UserId};
use sqlx::{Sqlite, Transaction};

use super::SqliteRepository;
use super::mapping::{course_id_from_i64, db_err, id_i64, map_course_row};
use crate::repository::{CourseRepository, NewCourseRecord, StorageError};

const COURSE_COLUMNS: &str = "id, owner_id, course_code, course_name, classes_attended, \
     total_classes, target_percentage, created_at";

/// Load a course owned by `owner` inside an open transaction.
pub(super) async fn course_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    owner: UserId,
    id: CourseId,
) -> Result<Course, StorageError> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1 AND owner_id = ?2");
    let row = sqlx::query(&sql)
        .bind(id_i64("course_id", id.value())?)
        .bind(id_i64("owner_id", owner.value())?)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_err)?;
    match row {
        Some(row) => map_course_row(&row),
        None => Err(StorageError::NotFound),
    }
}

/// Write back the counters of a course inside an open transaction.
pub(super) async fn store_counters_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    course: &Course,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
        UPDATE courses SET classes_attended = ?2, total_classes = ?3
        WHERE id = ?1
        ",
    )
    .bind(id_i64("course_id", course.id().value())?)
    .bind(i64::from(course.classes_attended()))
    .bind(i64::from(course.total_classes()))
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn insert_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO courses (owner_id, course_code, course_name, classes_attended, total_classes, target_percentage, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(id_i64("owner_id", course.owner.value())?)
        .bind(course.code)
        .bind(course.name)
        .bind(i64::from(course.classes_attended))
        .bind(i64::from(course.total_classes))
        .bind(i64::from(course.target.value()))
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        course_id_from_i64(res.last_insert_rowid())
    }

    async fn update_course(&self, course: &Course) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE courses
            SET course_code = ?3,
                course_name = ?4,
                classes_attended = ?5,
                total_classes = ?6,
                target_percentage = ?7
            WHERE id = ?1 AND owner_id = ?2
            ",
        )
        .bind(id_i64("course_id", course.id().value())?)
        .bind(id_i64("owner_id", course.owner().value())?)
        .bind(course.code())
        .bind(course.name())
        .bind(i64::from(course.classes_attended()))
        .bind(i64::from(course.total_classes()))
        .bind(i64::from(course.target().value()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_course(&self, owner: UserId, id: CourseId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM courses WHERE id = ?1 AND owner_id = ?2")
            .bind(id_i64("course_id", id.value())?)
            .bind(id_i64("owner_id", owner.value())?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_course(&self, owner: UserId, id: CourseId) -> Result<Course, StorageError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1 AND owner_id = ?2");
        let row = sqlx::query(&sql)
            .bind(id_i64("course_id", id.value())?)
            .bind(id_i64("owner_id", owner.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => map_course_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_courses(&self, owner: UserId) -> Result<Vec<Course>, StorageError> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE owner_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(id_i64("owner_id", owner.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(map_course_row(&row)?);
        }
        Ok(courses)
    }
}

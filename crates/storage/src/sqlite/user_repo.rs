use attendance_core::model::{UserId, UserProfile};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{db_err, id_i64, map_profile_row, ser, user_id_from_i64};
use crate::repository::{NewUserRecord, StorageError, UserCredentials, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO users (name, email, roll_number, university, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.roll_number)
        .bind(user.university)
        .bind(user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        user_id_from_i64(res.last_insert_rowid())
    }

    async fn get_user(&self, id: UserId) -> Result<UserProfile, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, roll_number, university, created_at
            FROM users WHERE id = ?1
            ",
        )
        .bind(id_i64("user_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => map_profile_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, roll_number, university, created_at, password_hash
            FROM users WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(UserCredentials {
            profile: map_profile_row(&row)?,
            password_hash: row.try_get("password_hash").map_err(ser)?,
        }))
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE users
            SET name = ?2, email = ?3, roll_number = ?4, university = ?5
            WHERE id = ?1
            ",
        )
        .bind(id_i64("user_id", profile.id.value())?)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.roll_number)
        .bind(&profile.university)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

use attendance_core::model::{
    AttendanceRecord, AttendanceStatus, Course, CourseId, Feedback, FeedbackCategory, FeedbackId,
    FeedbackKind, FeedbackPriority, FeedbackStatus, RecordId, TargetPercentage, UserId,
    UserProfile,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps driver errors, keeping constraint violations distinguishable.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        other => StorageError::Connection(other.to_string()),
    }
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn record_id_from_i64(v: i64) -> Result<RecordId, StorageError> {
    Ok(RecordId::new(i64_to_u64("record_id", v)?))
}

pub(crate) fn feedback_id_from_i64(v: i64) -> Result<FeedbackId, StorageError> {
    Ok(FeedbackId::new(i64_to_u64("feedback_id", v)?))
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<UserProfile, StorageError> {
    Ok(UserProfile {
        id: user_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        name: row.try_get("name").map_err(ser)?,
        email: row.try_get("email").map_err(ser)?,
        roll_number: row.try_get("roll_number").map_err(ser)?,
        university: row.try_get("university").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let target_raw: i64 = row.try_get("target_percentage").map_err(ser)?;
    let target = u8::try_from(target_raw)
        .map_err(|_| StorageError::Serialization(format!("invalid target: {target_raw}")))
        .and_then(|t| TargetPercentage::new(t).map_err(ser))?;

    Course::new(
        course_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        user_id_from_i64(row.try_get::<i64, _>("owner_id").map_err(ser)?)?,
        row.try_get::<String, _>("course_code").map_err(ser)?,
        row.try_get::<String, _>("course_name").map_err(ser)?,
        u32_from_i64(
            "classes_attended",
            row.try_get::<i64, _>("classes_attended").map_err(ser)?,
        )?,
        u32_from_i64(
            "total_classes",
            row.try_get::<i64, _>("total_classes").map_err(ser)?,
        )?,
        target,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_record_row(row: &SqliteRow) -> Result<AttendanceRecord, StorageError> {
    let status: String = row.try_get("status").map_err(ser)?;
    Ok(AttendanceRecord {
        id: record_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        user_id: user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        course_id: course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?,
        date: row.try_get("date").map_err(ser)?,
        status: AttendanceStatus::parse(&status).map_err(ser)?,
        note: row.try_get("note").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

/// Categories are stored as a JSON array of labels.
pub(crate) fn categories_to_json(categories: &[FeedbackCategory]) -> Result<String, StorageError> {
    let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
    serde_json::to_string(&labels).map_err(ser)
}

fn categories_from_json(raw: &str) -> Result<Vec<FeedbackCategory>, StorageError> {
    let labels: Vec<String> = serde_json::from_str(raw).map_err(ser)?;
    labels
        .iter()
        .map(|label| FeedbackCategory::parse(label).map_err(ser))
        .collect()
}

pub(crate) fn map_feedback_row(row: &SqliteRow) -> Result<Feedback, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let priority: String = row.try_get("priority").map_err(ser)?;
    let status: String = row.try_get("status").map_err(ser)?;
    let categories: String = row.try_get("categories").map_err(ser)?;

    Ok(Feedback {
        id: feedback_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        user_id: user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        kind: FeedbackKind::parse(&kind).map_err(ser)?,
        subject: row.try_get("subject").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        categories: categories_from_json(&categories)?,
        priority: FeedbackPriority::parse(&priority).map_err(ser)?,
        status: FeedbackStatus::parse(&status).map_err(ser)?,
        platform: row.try_get("platform").map_err(ser)?,
        app_version: row.try_get("app_version").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_json_uses_labels() {
        let json =
            categories_to_json(&[FeedbackCategory::Calendar, FeedbackCategory::Other]).unwrap();
        assert_eq!(json, r#"["Calendar","Other"]"#);
        assert_eq!(
            categories_from_json(&json).unwrap(),
            vec![FeedbackCategory::Calendar, FeedbackCategory::Other]
        );
        assert!(categories_from_json(r#"["Nope"]"#).is_err());
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(course_id_from_i64(-1).is_err());
        assert_eq!(course_id_from_i64(7).unwrap(), CourseId::new(7));
    }
}

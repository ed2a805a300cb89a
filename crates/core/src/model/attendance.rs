use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, RecordId, UserId};

/// Longest free-text note stored with a record.
pub const MAX_NOTE_LEN: usize = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttendanceError {
    #[error("note must be at most 500 characters")]
    NoteTooLong,

    #[error("invalid attendance status: {0}")]
    InvalidStatus(String),
}

/// How a student was marked for one class date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Holiday,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Holiday];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Holiday => "holiday",
        }
    }

    /// Parses the lowercase storage form.
    ///
    /// # Errors
    ///
    /// Returns `AttendanceError::InvalidStatus` for unknown values.
    pub fn parse(value: &str) -> Result<Self, AttendanceError> {
        match value {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "holiday" => Ok(Self::Holiday),
            other => Err(AttendanceError::InvalidStatus(other.to_owned())),
        }
    }

    #[must_use]
    pub fn counts_as_attended(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Trim a note and drop it when empty.
///
/// # Errors
///
/// Returns `AttendanceError::NoteTooLong` past [`MAX_NOTE_LEN`] characters.
pub fn normalize_note(note: Option<String>) -> Result<Option<String>, AttendanceError> {
    let note = note.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty());
    if note
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_NOTE_LEN)
    {
        return Err(AttendanceError::NoteTooLong);
    }
    Ok(note)
}

/// One attendance entry for a (user, course, date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_storage_form() {
        for status in AttendanceStatus::ALL {
            assert_eq!(AttendanceStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(AttendanceStatus::parse("late").is_err());
    }

    #[test]
    fn only_present_counts() {
        assert!(AttendanceStatus::Present.counts_as_attended());
        assert!(!AttendanceStatus::Absent.counts_as_attended());
        assert!(!AttendanceStatus::Holiday.counts_as_attended());
    }

    #[test]
    fn note_is_trimmed_and_bounded() {
        assert_eq!(normalize_note(Some("  lab  ".into())).unwrap(), Some("lab".into()));
        assert_eq!(normalize_note(Some("   ".into())).unwrap(), None);
        assert_eq!(normalize_note(None).unwrap(), None);
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert_eq!(normalize_note(Some(long)), Err(AttendanceError::NoteTooLong));
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use attendance_core::model::{
    AttendanceError, CourseError, FeedbackError, GoalError, ProfileError, StreakError,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AttendanceService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttendanceServiceError {
    #[error("select at least one course")]
    EmptySelection,
    #[error("attendance already marked for {} on this date", .0.join(", "))]
    AlreadyMarked(Vec<String>),
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FeedbackService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the key-value backed services (goals, streaks, preferences).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocalDataError {
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Streak(#[from] StreakError),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("please sign in first")]
    NotSignedIn,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

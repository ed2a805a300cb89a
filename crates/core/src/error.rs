use thiserror::Error;

use crate::model::{
    AttendanceError, CourseError, FeedbackError, GoalError, ProfileError, StreakError,
};

/// Any domain validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Streak(#[from] StreakError),
}

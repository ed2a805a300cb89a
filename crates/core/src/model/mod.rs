mod attendance;
mod course;
mod feedback;
mod goal;
mod ids;
mod preferences;
mod streak;
mod user;

pub use ids::{CourseId, FeedbackId, GoalId, ParseIdError, RecordId, UserId};

pub use attendance::{AttendanceError, AttendanceRecord, AttendanceStatus, MAX_NOTE_LEN, normalize_note};
pub use course::{
    Course, CourseDraft, CourseError, MAX_COURSE_CODE_LEN, MAX_COURSE_NAME_LEN, TargetPercentage,
};
pub use feedback::{
    APP_VERSION, DAILY_SUBMISSION_CAP, Feedback, FeedbackCategory, FeedbackDraft, FeedbackError,
    FeedbackKind, FeedbackPriority, FeedbackStatus, MAX_DESCRIPTION_LEN, MAX_SUBJECT_LEN,
    MIN_DESCRIPTION_LEN, ValidFeedback,
};
pub use goal::{Goal, GoalDraft, GoalError, GoalKind};
pub use preferences::{CalculatorInput, CalculatorIssue, Preferences};
pub use streak::{CustomGoal, StreakData, StreakError};
pub use user::{
    MIN_NAME_LEN, MIN_PASSWORD_LEN, MIN_ROLL_NUMBER_LEN, ProfileDraft, ProfileError, UserProfile,
    is_university_email, is_valid_email, validate_password,
};

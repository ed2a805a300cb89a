#![forbid(unsafe_code)]

pub mod app_services;
pub mod attendance_service;
pub mod auth_service;
pub mod course_service;
pub mod course_store;
pub mod error;
pub mod feedback_service;
pub mod goal_service;
mod local_store;
pub mod preferences_service;
pub mod stats_service;
pub mod streak_service;

pub use attendance_core::Clock;

pub use app_services::AppServices;
pub use attendance_service::{AttendanceService, BulkMarkRequest};
pub use auth_service::AuthService;
pub use course_service::CourseService;
pub use course_store::{CourseState, CourseStore, Notice, NoticeKind};
pub use error::{
    AppServicesError, AttendanceServiceError, AuthError, CourseServiceError,
    FeedbackServiceError, LocalDataError, StatsServiceError,
};
pub use feedback_service::FeedbackService;
pub use goal_service::GoalService;
pub use preferences_service::PreferencesService;
pub use stats_service::{Dashboard, StatisticsReport, StatsService};
pub use streak_service::StreakService;

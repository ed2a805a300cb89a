mod calendar;
mod components;
mod courses;
mod dashboard;
mod disclaimer;
mod feedback;
mod feedback_history;
mod goals;
mod login;
mod profile;
mod signup;
mod state;
mod statistics;
mod streaks;

pub use calendar::CalendarView;
pub use components::{QuickCalculator, Toast};
pub use courses::CoursesView;
pub use dashboard::DashboardView;
pub use disclaimer::DisclaimerView;
pub use feedback::FeedbackView;
pub use feedback_history::FeedbackHistoryView;
pub use goals::GoalsView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use signup::SignupView;
pub use state::{ViewError, ViewState, view_error, view_state_from_resource};
pub use statistics::StatisticsView;
pub use streaks::StreaksView;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

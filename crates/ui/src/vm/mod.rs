mod calculator_vm;
mod calendar_vm;
mod course_vm;
mod dashboard_vm;
mod feedback_vm;
mod goal_vm;
mod statistics_vm;
mod streak_vm;
mod time_fmt;

pub use calculator_vm::{CalculatorResultVm, CalculatorVm, map_calculator};
pub use calendar_vm::{CalendarDayVm, CalendarMonthVm, build_month, next_month, previous_month};
pub use course_vm::{CourseCardVm, CourseFormVm, map_course_cards, percent_label, tier_class};
pub use dashboard_vm::{DASHBOARD_COURSE_LIMIT, DashboardVm, OverallVm, map_dashboard};
pub use feedback_vm::{FeedbackCardVm, FeedbackFormVm, map_feedback_cards, status_class};
pub use goal_vm::{GoalCardVm, GoalFormVm, map_goal_cards};
pub use statistics_vm::{MonthBarVm, SplitVm, StatisticsVm, map_statistics};
pub use streak_vm::{AchievementVm, CustomGoalVm, StreaksVm, map_streaks};
pub use time_fmt::{format_date, format_datetime, format_input_date, month_of, parse_input_date};

use attendance_core::stats::OverallStats;
use services::Dashboard;

use crate::vm::course_vm::{CourseCardVm, map_course_cards, percent_label, tier_class};

/// The dashboard shows at most this many course cards.
pub const DASHBOARD_COURSE_LIMIT: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct OverallVm {
    pub percentage_str: String,
    pub tier_class: &'static str,
    pub badge: &'static str,
    pub course_count: usize,
    pub attended_str: String,
    pub margin_title: &'static str,
    pub margin_value: String,
    pub safe: usize,
    pub warning: usize,
    pub critical: usize,
}

impl From<&OverallStats> for OverallVm {
    fn from(overall: &OverallStats) -> Self {
        let at_target = overall.percentage >= overall.snapshot.target;
        let (margin_title, margin) = if at_target {
            ("Can Miss", overall.classes_can_miss)
        } else {
            ("Need to Attend", overall.classes_needed)
        };
        Self {
            percentage_str: percent_label(overall.percentage),
            tier_class: tier_class(overall.status.tier()),
            badge: overall.status.label(),
            course_count: overall.course_count,
            attended_str: format!("{}/{}", overall.attended(), overall.total()),
            margin_title,
            margin_value: format!("{margin} classes"),
            safe: overall.safe,
            warning: overall.warning,
            critical: overall.critical,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub overall: OverallVm,
    pub courses: Vec<CourseCardVm>,
    pub more_courses: bool,
}

#[must_use]
pub fn map_dashboard(dashboard: &Dashboard) -> DashboardVm {
    let mut courses = map_course_cards(&dashboard.courses);
    let more_courses = courses.len() > DASHBOARD_COURSE_LIMIT;
    courses.truncate(DASHBOARD_COURSE_LIMIT);
    DashboardVm {
        overall: OverallVm::from(&dashboard.overall),
        courses,
        more_courses,
    }
}

use attendance_core::stats::MonthlyAttendance;
use services::StatisticsReport;

use crate::vm::course_vm::{CourseCardVm, map_course_cards, percent_label};
use crate::vm::dashboard_vm::OverallVm;

#[derive(Clone, Debug, PartialEq)]
pub struct MonthBarVm {
    pub label: String,
    pub percentage_str: String,
    pub height: f64,
    pub counts_str: String,
}

impl From<&MonthlyAttendance> for MonthBarVm {
    fn from(month: &MonthlyAttendance) -> Self {
        Self {
            label: month.label(),
            percentage_str: percent_label(month.percentage),
            height: month.percentage.clamp(0.0, 100.0),
            counts_str: format!("{}/{}", month.present, month.total),
        }
    }
}

/// Attended vs missed split for the pie chart.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitVm {
    pub attended: u32,
    pub missed: u32,
    pub attended_share: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatisticsVm {
    pub overall: OverallVm,
    pub split: SplitVm,
    pub courses: Vec<CourseCardVm>,
    pub months: Vec<MonthBarVm>,
}

#[must_use]
pub fn map_statistics(report: &StatisticsReport) -> StatisticsVm {
    let overall = &report.overall;
    StatisticsVm {
        overall: OverallVm::from(overall),
        split: SplitVm {
            attended: overall.attended(),
            missed: overall.missed(),
            attended_share: overall.percentage.clamp(0.0, 100.0),
        },
        courses: map_course_cards(&report.courses),
        months: report.monthly.iter().map(MonthBarVm::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::stats::OverallStats;

    #[test]
    fn month_bar_labels() {
        let bar = MonthBarVm::from(&MonthlyAttendance {
            year: 2024,
            month: 2,
            present: 3,
            total: 4,
            percentage: 75.0,
        });
        assert_eq!(bar.label, "Feb");
        assert_eq!(bar.percentage_str, "75.0%");
        assert_eq!(bar.counts_str, "3/4");
    }

    #[test]
    fn empty_report_has_zero_split() {
        let vm = map_statistics(&StatisticsReport {
            courses: Vec::new(),
            overall: OverallStats::from_courses(&[], 80.0),
            monthly: Vec::new(),
        });
        assert_eq!(vm.split.attended, 0);
        assert_eq!(vm.split.missed, 0);
        assert_eq!(vm.overall.percentage_str, "0.0%");
    }
}

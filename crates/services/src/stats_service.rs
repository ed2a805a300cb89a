use std::sync::Arc;

use attendance_core::model::UserId;
use attendance_core::stats::{
    CourseStats, DASHBOARD_TARGET, MonthlyAttendance, OverallStats, monthly_breakdown,
};
use storage::repository::{AttendanceRepository, CourseRepository};

use crate::error::StatsServiceError;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub courses: Vec<CourseStats>,
    pub overall: OverallStats,
}

/// Everything the statistics page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub courses: Vec<CourseStats>,
    pub overall: OverallStats,
    pub monthly: Vec<MonthlyAttendance>,
}

#[derive(Clone)]
pub struct StatsService {
    courses: Arc<dyn CourseRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            courses,
            attendance,
        }
    }

    /// Per-course stats plus the overall figure against the dashboard target.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if repository access fails.
    pub async fn dashboard(&self, owner: UserId) -> Result<Dashboard, StatsServiceError> {
        let courses = self.courses.list_courses(owner).await?;
        Ok(Dashboard {
            overall: OverallStats::from_courses(&courses, DASHBOARD_TARGET),
            courses: courses.iter().map(CourseStats::from_course).collect(),
        })
    }

    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if repository access fails.
    pub async fn statistics(&self, owner: UserId) -> Result<StatisticsReport, StatsServiceError> {
        let courses = self.courses.list_courses(owner).await?;
        let records = self.attendance.list_records(owner, None).await?;
        Ok(StatisticsReport {
            overall: OverallStats::from_courses(&courses, DASHBOARD_TARGET),
            courses: courses.iter().map(CourseStats::from_course).collect(),
            monthly: monthly_breakdown(&records),
        })
    }
}

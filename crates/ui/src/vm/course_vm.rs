use attendance_core::model::{Course, CourseDraft, CourseId};
use attendance_core::stats::CourseStats;
use attendance_core::threshold::{AttendanceTier, format_percentage, format_target};

/// CSS class for a tier badge or progress bar.
#[must_use]
pub fn tier_class(tier: AttendanceTier) -> &'static str {
    match tier {
        AttendanceTier::Safe => "tier-safe",
        AttendanceTier::Warning => "tier-warning",
        AttendanceTier::Critical => "tier-critical",
    }
}

/// Display-only rounding to one decimal.
#[must_use]
pub fn percent_label(value: f64) -> String {
    format!("{}%", format_percentage(value, 1))
}

#[derive(Clone, Debug, PartialEq)]
pub struct CourseCardVm {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub percentage_str: String,
    pub bar_width: f64,
    pub tier_class: &'static str,
    pub status_label: &'static str,
    pub status_icon: &'static str,
    pub counts_str: String,
    pub target_str: String,
    /// "Can miss" when at or above target, otherwise "Need to attend".
    pub margin_label: &'static str,
    pub margin_value: String,
    pub message: String,
}

impl From<&CourseStats> for CourseCardVm {
    fn from(stats: &CourseStats) -> Self {
        let at_target = stats.percentage >= stats.snapshot.target;
        let (margin_label, margin) = if at_target {
            ("Can miss", stats.classes_can_miss)
        } else {
            ("Need to attend", stats.classes_needed)
        };
        Self {
            id: stats.course_id,
            code: stats.code.clone(),
            name: stats.name.clone(),
            percentage_str: percent_label(stats.percentage),
            bar_width: stats.percentage.clamp(0.0, 100.0),
            tier_class: tier_class(stats.status.tier()),
            status_label: stats.status.label(),
            status_icon: stats.status.icon(),
            counts_str: format!("{}/{}", stats.snapshot.attended, stats.snapshot.total),
            target_str: format!("Target: {}%", format_target(stats.snapshot.target)),
            margin_label,
            margin_value: format!("{margin} classes"),
            message: stats.message.clone(),
        }
    }
}

#[must_use]
pub fn map_course_cards(stats: &[CourseStats]) -> Vec<CourseCardVm> {
    stats.iter().map(CourseCardVm::from).collect()
}

/// Text fields backing the add/edit course modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseFormVm {
    pub editing: Option<CourseId>,
    pub code: String,
    pub name: String,
    pub classes_attended: String,
    pub total_classes: String,
    pub target: String,
}

impl Default for CourseFormVm {
    fn default() -> Self {
        Self {
            editing: None,
            code: String::new(),
            name: String::new(),
            classes_attended: "0".into(),
            total_classes: "0".into(),
            target: "75".into(),
        }
    }
}

impl CourseFormVm {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let draft = course.to_draft();
        Self {
            editing: Some(course.id()),
            code: draft.code,
            name: draft.name,
            classes_attended: draft.classes_attended.to_string(),
            total_classes: draft.total_classes.to_string(),
            target: draft.target.to_string(),
        }
    }

    /// Parse the numeric fields; domain rules are checked by the service.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message naming the first unreadable field.
    pub fn to_draft(&self) -> Result<CourseDraft, &'static str> {
        let classes_attended = self
            .classes_attended
            .trim()
            .parse()
            .map_err(|_| "Classes attended must be a whole number")?;
        let total_classes = self
            .total_classes
            .trim()
            .parse()
            .map_err(|_| "Total classes must be a whole number")?;
        let target = self
            .target
            .trim()
            .parse()
            .map_err(|_| "Target must be between 1 and 99")?;
        Ok(CourseDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            classes_attended,
            total_classes,
            target,
        })
    }
}

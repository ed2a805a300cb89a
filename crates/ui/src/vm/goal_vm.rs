use attendance_core::model::{Course, Goal, GoalDraft, GoalId, GoalKind};
use chrono::NaiveDate;

use crate::vm::course_vm::percent_label;
use crate::vm::time_fmt::{format_date, parse_input_date};

#[derive(Clone, Debug, PartialEq)]
pub struct GoalCardVm {
    pub id: GoalId,
    pub title: String,
    pub kind_label: &'static str,
    pub course_label: Option<String>,
    pub target_str: String,
    pub progress: f64,
    pub progress_str: String,
    pub deadline: Option<String>,
    pub overdue: bool,
    pub completed: bool,
}

#[must_use]
pub fn map_goal_cards(goals: &[Goal], courses: &[Course], today: NaiveDate) -> Vec<GoalCardVm> {
    goals
        .iter()
        .map(|goal| {
            let progress = goal.progress(courses);
            GoalCardVm {
                id: goal.id,
                title: goal.title.clone(),
                kind_label: match goal.kind {
                    GoalKind::Attendance => "Attendance",
                    GoalKind::Custom => "Custom",
                },
                course_label: goal
                    .course_id
                    .and_then(|id| courses.iter().find(|c| c.id() == id))
                    .map(|c| format!("{} - {}", c.code(), c.name())),
                target_str: format!("Target: {}%", goal.target_value),
                progress,
                progress_str: percent_label(progress),
                deadline: goal.deadline.map(format_date),
                overdue: goal.is_overdue(today),
                completed: goal.completed,
            }
        })
        .collect()
}

/// Form state of the add-goal modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalFormVm {
    pub title: String,
    pub kind: GoalKind,
    pub target: String,
    pub course: String,
    pub deadline: String,
}

impl Default for GoalFormVm {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: GoalKind::Attendance,
            target: GoalDraft::default().target_value.to_string(),
            course: String::new(),
            deadline: String::new(),
        }
    }
}

impl GoalFormVm {
    /// # Errors
    ///
    /// Returns a user-facing message when the target is not a number.
    pub fn to_draft(&self) -> Result<GoalDraft, &'static str> {
        let target_value = self
            .target
            .trim()
            .parse()
            .map_err(|_| "Target must be between 1 and 100")?;
        Ok(GoalDraft {
            title: self.title.clone(),
            kind: self.kind,
            target_value,
            course_id: self.course.parse().ok(),
            deadline: parse_input_date(&self.deadline),
        })
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::course::Course;
use crate::model::ids::{CourseId, GoalId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("please enter a goal title")]
    EmptyTitle,

    #[error("goal target must be between 1 and 100, got {0}")]
    InvalidTarget(u8),

    #[error("goal not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    #[default]
    Attendance,
    Custom,
}

/// Form input for a new goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub title: String,
    pub kind: GoalKind,
    pub target_value: u8,
    pub course_id: Option<CourseId>,
    pub deadline: Option<NaiveDate>,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: GoalKind::Attendance,
            target_value: 80,
            course_id: None,
            deadline: None,
        }
    }
}

/// A locally stored attendance goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub target_value: u8,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl Goal {
    /// # Errors
    ///
    /// Returns `GoalError` for a blank title or a target outside `1..=100`.
    pub fn new(id: GoalId, draft: GoalDraft, created_at: DateTime<Utc>) -> Result<Self, GoalError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(GoalError::EmptyTitle);
        }
        if !(1..=100).contains(&draft.target_value) {
            return Err(GoalError::InvalidTarget(draft.target_value));
        }
        Ok(Self {
            id,
            title,
            kind: draft.kind,
            target_value: draft.target_value,
            course_id: draft.course_id,
            deadline: draft.deadline,
            created_at,
            completed: false,
        })
    }

    /// Progress toward the goal in `[0, 100]`.
    ///
    /// Attendance goals linked to a known course track that course's current
    /// percentage relative to the goal target; anything else is all-or-nothing
    /// on the completion flag.
    #[must_use]
    pub fn progress(&self, courses: &[Course]) -> f64 {
        if self.kind == GoalKind::Attendance {
            if let Some(course) = self
                .course_id
                .and_then(|id| courses.iter().find(|c| c.id() == id))
            {
                let current = course.snapshot().percentage();
                return (current / f64::from(self.target_value) * 100.0).min(100.0);
            }
        }
        if self.completed { 100.0 } else { 0.0 }
    }

    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|deadline| deadline < today)
    }
}

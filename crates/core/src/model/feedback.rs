use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{FeedbackId, UserId};

pub const MAX_SUBJECT_LEN: usize = 100;
pub const MIN_DESCRIPTION_LEN: usize = 30;
pub const MAX_DESCRIPTION_LEN: usize = 5_000;

/// Submissions allowed per user per calendar day.
pub const DAILY_SUBMISSION_CAP: u32 = 10;

/// Version string attached to every submission.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("subject too long (max 100 chars)")]
    SubjectTooLong,

    #[error("description too short (min 30 chars)")]
    DescriptionTooShort,

    #[error("description too long (max 5000 chars)")]
    DescriptionTooLong,

    #[error("daily limit reached (10/day)")]
    DailyLimitReached,

    #[error("cannot move feedback from {from} to {to}")]
    InvalidTransition {
        from: FeedbackStatus,
        to: FeedbackStatus,
    },

    #[error("invalid feedback field value: {0}")]
    InvalidValue(String),
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedbackKind {
    BugReport,
    FeatureRequest,
    #[default]
    GeneralFeedback,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 3] = [Self::BugReport, Self::FeatureRequest, Self::GeneralFeedback];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BugReport => "Bug Report",
            Self::FeatureRequest => "Feature Request",
            Self::GeneralFeedback => "General Feedback",
        }
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::InvalidValue` for unknown labels.
    pub fn parse(value: &str) -> Result<Self, FeedbackError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == value)
            .ok_or_else(|| FeedbackError::InvalidValue(value.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCategory {
    Dashboard,
    Courses,
    Calculator,
    Statistics,
    Calendar,
    Other,
}

impl FeedbackCategory {
    pub const ALL: [FeedbackCategory; 6] = [
        Self::Dashboard,
        Self::Courses,
        Self::Calculator,
        Self::Statistics,
        Self::Calendar,
        Self::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Courses => "Courses",
            Self::Calculator => "Calculator",
            Self::Statistics => "Statistics",
            Self::Calendar => "Calendar",
            Self::Other => "Other",
        }
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::InvalidValue` for unknown labels.
    pub fn parse(value: &str) -> Result<Self, FeedbackError> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == value)
            .ok_or_else(|| FeedbackError::InvalidValue(value.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedbackPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl FeedbackPriority {
    pub const ALL: [FeedbackPriority; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::InvalidValue` for unknown labels.
    pub fn parse(value: &str) -> Result<Self, FeedbackError> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.label() == value)
            .ok_or_else(|| FeedbackError::InvalidValue(value.to_owned()))
    }
}

/// Review workflow: Pending → Under Review → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedbackStatus {
    #[default]
    Pending,
    UnderReview,
    Completed,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 3] = [Self::Pending, Self::UnderReview, Self::Completed];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderReview => "Under Review",
            Self::Completed => "Completed",
        }
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::InvalidValue` for unknown labels.
    pub fn parse(value: &str) -> Result<Self, FeedbackError> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| FeedbackError::InvalidValue(value.to_owned()))
    }

    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::UnderReview => 1,
            Self::Completed => 2,
        }
    }

    /// Status only moves forward; a completed report stays completed.
    #[must_use]
    pub fn can_transition_to(self, next: FeedbackStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Form input for a new report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackDraft {
    pub kind: FeedbackKind,
    pub subject: String,
    pub description: String,
    pub categories: Vec<FeedbackCategory>,
    pub priority: FeedbackPriority,
}

impl FeedbackDraft {
    /// Validate user input before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError` when the subject is empty or longer than
    /// [`MAX_SUBJECT_LEN`], or the description is shorter than
    /// [`MIN_DESCRIPTION_LEN`].
    pub fn validate(self) -> Result<ValidFeedback, FeedbackError> {
        let subject = self.subject.trim().to_owned();
        let description = self.description.trim().to_owned();

        if subject.is_empty() {
            return Err(FeedbackError::EmptySubject);
        }
        if subject.chars().count() > MAX_SUBJECT_LEN {
            return Err(FeedbackError::SubjectTooLong);
        }
        let description_len = description.chars().count();
        if description_len < MIN_DESCRIPTION_LEN {
            return Err(FeedbackError::DescriptionTooShort);
        }
        if description_len > MAX_DESCRIPTION_LEN {
            return Err(FeedbackError::DescriptionTooLong);
        }

        let mut categories = Vec::with_capacity(self.categories.len());
        for category in self.categories {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        Ok(ValidFeedback {
            kind: self.kind,
            subject,
            description,
            categories,
            priority: self.priority,
        })
    }
}

/// Draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFeedback {
    pub kind: FeedbackKind,
    pub subject: String,
    pub description: String,
    pub categories: Vec<FeedbackCategory>,
    pub priority: FeedbackPriority,
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// A submitted report. Only a reviewer changes `status` after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub kind: FeedbackKind,
    pub subject: String,
    pub description: String,
    pub categories: Vec<FeedbackCategory>,
    pub priority: FeedbackPriority,
    pub status: FeedbackStatus,
    pub platform: String,
    pub app_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

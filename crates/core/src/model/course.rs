use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::attendance::AttendanceStatus;
use crate::model::ids::{CourseId, UserId};
use crate::threshold::AttendanceSnapshot;

/// Longest course code accepted by the form.
pub const MAX_COURSE_CODE_LEN: usize = 20;

/// Longest course name accepted by the form.
pub const MAX_COURSE_NAME_LEN: usize = 120;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course code cannot be empty")]
    EmptyCode,

    #[error("course code must be at most 20 characters")]
    CodeTooLong,

    #[error("course name cannot be empty")]
    EmptyName,

    #[error("course name must be at most 120 characters")]
    NameTooLong,

    #[error("classes attended cannot exceed total classes")]
    AttendedExceedsTotal,

    #[error("target percentage must be between 1 and 99, got {0}")]
    InvalidTarget(u8),

    #[error("class counter overflow")]
    CounterOverflow,
}

//
// ─── TARGET ────────────────────────────────────────────────────────────────────
//

/// Attendance threshold a course must meet, in whole percent.
///
/// 0 and 100 are rejected here: both make one of the threshold formulas
/// divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TargetPercentage(u8);

impl TargetPercentage {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    /// # Errors
    ///
    /// Returns `CourseError::InvalidTarget` outside `1..=99`.
    pub fn new(value: u8) -> Result<Self, CourseError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CourseError::InvalidTarget(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for TargetPercentage {
    fn default() -> Self {
        Self(75)
    }
}

impl TryFrom<u8> for TargetPercentage {
    type Error = CourseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetPercentage> for u8 {
    fn from(value: TargetPercentage) -> Self {
        value.0
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A subject the student tracks, with running attendance counters.
///
/// `classes_attended <= total_classes` holds for every constructed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    owner: UserId,
    code: String,
    name: String,
    classes_attended: u32,
    total_classes: u32,
    target: TargetPercentage,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a validated course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for empty or oversized code/name, or when
    /// `classes_attended > total_classes`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        owner: UserId,
        code: impl Into<String>,
        name: impl Into<String>,
        classes_attended: u32,
        total_classes: u32,
        target: TargetPercentage,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let code = code.into().trim().to_owned();
        let name = name.into().trim().to_owned();

        if code.is_empty() {
            return Err(CourseError::EmptyCode);
        }
        if code.chars().count() > MAX_COURSE_CODE_LEN {
            return Err(CourseError::CodeTooLong);
        }
        if name.is_empty() {
            return Err(CourseError::EmptyName);
        }
        if name.chars().count() > MAX_COURSE_NAME_LEN {
            return Err(CourseError::NameTooLong);
        }
        if classes_attended > total_classes {
            return Err(CourseError::AttendedExceedsTotal);
        }

        Ok(Self {
            id,
            owner,
            code,
            name,
            classes_attended,
            total_classes,
            target,
            created_at,
        })
    }

    /// Returns a copy carrying the id assigned by storage.
    #[must_use]
    pub fn with_id(mut self, id: CourseId) -> Self {
        self.id = id;
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn classes_attended(&self) -> u32 {
        self.classes_attended
    }

    #[must_use]
    pub fn total_classes(&self) -> u32 {
        self.total_classes
    }

    #[must_use]
    pub fn target(&self) -> TargetPercentage {
        self.target
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn snapshot(&self) -> AttendanceSnapshot {
        AttendanceSnapshot::new(
            self.classes_attended,
            self.total_classes,
            self.target.as_f64(),
        )
    }

    /// Count one more held class with the given status.
    ///
    /// Every status grows `total_classes`; only `Present` grows
    /// `classes_attended`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CounterOverflow` if a counter would overflow.
    pub fn record_class(&mut self, status: AttendanceStatus) -> Result<(), CourseError> {
        let total = self
            .total_classes
            .checked_add(1)
            .ok_or(CourseError::CounterOverflow)?;
        let attended = if status.counts_as_attended() {
            self.classes_attended
                .checked_add(1)
                .ok_or(CourseError::CounterOverflow)?
        } else {
            self.classes_attended
        };
        self.total_classes = total;
        self.classes_attended = attended;
        Ok(())
    }

    /// Undo a previously recorded class. Counters never go below zero.
    pub fn unrecord_class(&mut self, status: AttendanceStatus) {
        if status.counts_as_attended() {
            self.classes_attended = self.classes_attended.saturating_sub(1);
        }
        self.total_classes = self.total_classes.saturating_sub(1);
        self.classes_attended = self.classes_attended.min(self.total_classes);
    }

    /// Re-count a recorded class whose status changed.
    pub fn change_recorded_status(&mut self, from: AttendanceStatus, to: AttendanceStatus) {
        match (from.counts_as_attended(), to.counts_as_attended()) {
            (true, false) => {
                self.classes_attended = self.classes_attended.saturating_sub(1);
            }
            (false, true) => {
                self.classes_attended = self.classes_attended.saturating_add(1).min(self.total_classes);
            }
            _ => {}
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Course form input before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub code: String,
    pub name: String,
    pub classes_attended: u32,
    pub total_classes: u32,
    pub target: u8,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            classes_attended: 0,
            total_classes: 0,
            target: TargetPercentage::default().value(),
        }
    }
}

impl CourseDraft {
    /// Validate the draft and build a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for an out-of-range target or any violation
    /// checked by [`Course::new`].
    pub fn into_course(
        self,
        id: CourseId,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Course, CourseError> {
        let target = TargetPercentage::new(self.target)?;
        Course::new(
            id,
            owner,
            self.code,
            self.name,
            self.classes_attended,
            self.total_classes,
            target,
            created_at,
        )
    }
}

impl Course {
    #[must_use]
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            classes_attended: self.classes_attended,
            total_classes: self.total_classes,
            target: self.target.value(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build(attended: u32, total: u32) -> Result<Course, CourseError> {
        Course::new(
            CourseId::new(1),
            UserId::new(1),
            "CS101",
            "Intro to Programming",
            attended,
            total,
            TargetPercentage::default(),
            fixed_now(),
        )
    }

    #[test]
    fn rejects_attended_above_total() {
        assert_eq!(build(11, 10).unwrap_err(), CourseError::AttendedExceedsTotal);
    }

    #[test]
    fn trims_code_and_name() {
        let course = Course::new(
            CourseId::new(1),
            UserId::new(1),
            "  MA201 ",
            "  Linear Algebra ",
            0,
            0,
            TargetPercentage::default(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(course.code(), "MA201");
        assert_eq!(course.name(), "Linear Algebra");
    }

    #[test]
    fn rejects_blank_fields() {
        let err = Course::new(
            CourseId::new(1),
            UserId::new(1),
            " ",
            "Name",
            0,
            0,
            TargetPercentage::default(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyCode);

        let err = Course::new(
            CourseId::new(1),
            UserId::new(1),
            "X1",
            "",
            0,
            0,
            TargetPercentage::default(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyName);
    }

    #[test]
    fn target_rejects_degenerate_values() {
        assert_eq!(TargetPercentage::new(0), Err(CourseError::InvalidTarget(0)));
        assert_eq!(TargetPercentage::new(100), Err(CourseError::InvalidTarget(100)));
        assert_eq!(TargetPercentage::new(75).unwrap().value(), 75);
        assert_eq!(TargetPercentage::default().value(), 75);
    }

    #[test]
    fn record_class_only_counts_present_as_attended() {
        let mut course = build(3, 4).unwrap();
        course.record_class(AttendanceStatus::Present).unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (4, 5));
        course.record_class(AttendanceStatus::Absent).unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (4, 6));
        course.record_class(AttendanceStatus::Holiday).unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (4, 7));
    }

    #[test]
    fn unrecord_class_keeps_invariant() {
        let mut course = build(0, 0).unwrap();
        course.unrecord_class(AttendanceStatus::Present);
        assert_eq!((course.classes_attended(), course.total_classes()), (0, 0));

        let mut course = build(2, 2).unwrap();
        course.unrecord_class(AttendanceStatus::Absent);
        assert_eq!((course.classes_attended(), course.total_classes()), (1, 1));
    }

    #[test]
    fn change_recorded_status_adjusts_attended() {
        let mut course = build(5, 10).unwrap();
        course.change_recorded_status(AttendanceStatus::Present, AttendanceStatus::Absent);
        assert_eq!(course.classes_attended(), 4);
        course.change_recorded_status(AttendanceStatus::Holiday, AttendanceStatus::Present);
        assert_eq!(course.classes_attended(), 5);
        course.change_recorded_status(AttendanceStatus::Absent, AttendanceStatus::Holiday);
        assert_eq!(course.classes_attended(), 5);
    }

    #[test]
    fn draft_validates_target() {
        let draft = CourseDraft {
            code: "EE110".into(),
            name: "Circuits".into(),
            classes_attended: 4,
            total_classes: 5,
            target: 100,
        };
        assert_eq!(
            draft
                .clone()
                .into_course(CourseId::new(1), UserId::new(1), fixed_now())
                .unwrap_err(),
            CourseError::InvalidTarget(100)
        );

        let course = CourseDraft { target: 80, ..draft }
            .into_course(CourseId::new(2), UserId::new(1), fixed_now())
            .unwrap();
        assert_eq!(course.target().value(), 80);
        assert_eq!(course.to_draft().code, "EE110");
    }

    #[test]
    fn snapshot_uses_course_target() {
        let course = build(50, 80).unwrap();
        let snapshot = course.snapshot();
        assert_eq!(snapshot.classes_needed(), 40);
        assert!((snapshot.target - 75.0).abs() < f64::EPSILON);
    }
}

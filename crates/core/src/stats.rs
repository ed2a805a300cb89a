//! Aggregates over courses and attendance records.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::model::{AttendanceRecord, AttendanceStatus, Course, CourseId, StreakData};
use crate::threshold::{AttendanceSnapshot, AttendanceTier, StatusInfo};

/// Target the dashboard uses for the overall figure.
pub const DASHBOARD_TARGET: f64 = 80.0;

//
// ─── PER COURSE ────────────────────────────────────────────────────────────────
//

/// Derived metrics for one course against its own target.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStats {
    pub course_id: CourseId,
    pub code: String,
    pub name: String,
    pub snapshot: AttendanceSnapshot,
    pub percentage: f64,
    pub status: StatusInfo,
    pub classes_needed: u32,
    pub classes_can_miss: u32,
    pub message: String,
}

impl CourseStats {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let snapshot = course.snapshot();
        Self {
            course_id: course.id(),
            code: course.code().to_owned(),
            name: course.name().to_owned(),
            percentage: snapshot.percentage(),
            status: snapshot.status(),
            classes_needed: snapshot.classes_needed(),
            classes_can_miss: snapshot.classes_can_miss(),
            message: snapshot.predictive_message(),
            snapshot,
        }
    }
}

//
// ─── OVERALL ───────────────────────────────────────────────────────────────────
//

/// Totals across every course.
///
/// The percentage is computed from the summed counters, never as an average
/// of per-course percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub course_count: usize,
    pub snapshot: AttendanceSnapshot,
    pub percentage: f64,
    pub status: StatusInfo,
    pub classes_needed: u32,
    pub classes_can_miss: u32,
    pub safe: usize,
    pub warning: usize,
    pub critical: usize,
}

impl OverallStats {
    #[must_use]
    pub fn from_courses(courses: &[Course], target: f64) -> Self {
        let attended = courses
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.classes_attended()));
        let total = courses
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.total_classes()));
        let snapshot = AttendanceSnapshot::new(attended, total, target);

        let (mut safe, mut warning, mut critical) = (0, 0, 0);
        for course in courses {
            match course.snapshot().status().tier() {
                AttendanceTier::Safe => safe += 1,
                AttendanceTier::Warning => warning += 1,
                AttendanceTier::Critical => critical += 1,
            }
        }

        Self {
            course_count: courses.len(),
            percentage: snapshot.percentage(),
            status: snapshot.status(),
            classes_needed: snapshot.classes_needed(),
            classes_can_miss: snapshot.classes_can_miss(),
            snapshot,
            safe,
            warning,
            critical,
        }
    }

    #[must_use]
    pub fn attended(&self) -> u32 {
        self.snapshot.attended
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.snapshot.total
    }

    #[must_use]
    pub fn missed(&self) -> u32 {
        self.snapshot.total - self.snapshot.attended
    }
}

//
// ─── CALENDAR ──────────────────────────────────────────────────────────────────
//

/// Colour class of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTile {
    Holiday,
    Good,
    Poor,
    Empty,
}

impl DayTile {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Holiday => "tile-holiday",
            Self::Good => "tile-good",
            Self::Poor => "tile-poor",
            Self::Empty => "tile-empty",
        }
    }
}

/// Status counts for the records of one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTally {
    pub present: u32,
    pub absent: u32,
    pub holiday: u32,
}

impl DayTally {
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record.status);
        }
        tally
    }

    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Holiday => self.holiday += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.present + self.absent + self.holiday
    }

    /// Holiday wins, then a present majority, then any absence.
    #[must_use]
    pub fn tile(&self) -> DayTile {
        if self.holiday > 0 {
            DayTile::Holiday
        } else if self.present > self.absent {
            DayTile::Good
        } else if self.absent > 0 {
            DayTile::Poor
        } else {
            DayTile::Empty
        }
    }
}

/// Group records by date.
#[must_use]
pub fn tally_by_date(records: &[AttendanceRecord]) -> BTreeMap<NaiveDate, DayTally> {
    let mut days: BTreeMap<NaiveDate, DayTally> = BTreeMap::new();
    for record in records {
        days.entry(record.date).or_default().add(record.status);
    }
    days
}

//
// ─── MONTHLY ───────────────────────────────────────────────────────────────────
//

/// Present share of all records in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAttendance {
    pub year: i32,
    pub month: u32,
    pub present: u32,
    pub total: u32,
    /// One decimal place.
    pub percentage: f64,
}

impl MonthlyAttendance {
    /// Short month label, `Jan` .. `Dec`.
    #[must_use]
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_default()
    }
}

/// Monthly trend in chronological order.
#[must_use]
pub fn monthly_breakdown(records: &[AttendanceRecord]) -> Vec<MonthlyAttendance> {
    let mut months: BTreeMap<(i32, u32), (u32, u32)> = BTreeMap::new();
    for record in records {
        let entry = months
            .entry((record.date.year(), record.date.month()))
            .or_default();
        entry.1 += 1;
        if record.status.counts_as_attended() {
            entry.0 += 1;
        }
    }

    months
        .into_iter()
        .map(|((year, month), (present, total))| MonthlyAttendance {
            year,
            month,
            present,
            total,
            percentage: round_one(f64::from(present) / f64::from(total) * 100.0),
        })
        .collect()
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//
// ─── PROGRESSION ───────────────────────────────────────────────────────────────
//

pub const XP_PER_LEVEL: u32 = 200;

/// Experience and level shown on the streaks page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub xp: u32,
    pub level: u32,
}

impl Progression {
    /// `xp = ⌊attended·10 + overall%·5 + streak·20⌋`, one level per 200 xp.
    #[must_use]
    pub fn compute(overall: &OverallStats, streaks: &StreakData) -> Self {
        let raw = f64::from(overall.attended()) * 10.0
            + overall.percentage * 5.0
            + f64::from(streaks.current_streak) * 20.0;
        // f64 -> u32 casts saturate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let xp = raw.floor() as u32;
        Self {
            xp,
            level: xp / XP_PER_LEVEL + 1,
        }
    }

    #[must_use]
    pub fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementKind {
    FireStarter,
    WeekWarrior,
    GoalCrusher,
    RisingStar,
    Champion,
    Unstoppable,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 6] = [
        Self::FireStarter,
        Self::WeekWarrior,
        Self::GoalCrusher,
        Self::RisingStar,
        Self::Champion,
        Self::Unstoppable,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::FireStarter => "Fire Starter",
            Self::WeekWarrior => "Week Warrior",
            Self::GoalCrusher => "Goal Crusher",
            Self::RisingStar => "Rising Star",
            Self::Champion => "Champion",
            Self::Unstoppable => "Unstoppable",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::FireStarter => "Maintain a 3-day streak",
            Self::WeekWarrior => "Maintain a 7-day streak",
            Self::GoalCrusher => "Reach 80% overall attendance",
            Self::RisingStar => "Reach level 5",
            Self::Champion => "Reach 90% overall attendance",
            Self::Unstoppable => "Reach a 30-day longest streak",
        }
    }

    fn threshold(self) -> f64 {
        match self {
            Self::FireStarter => 3.0,
            Self::WeekWarrior => 7.0,
            Self::GoalCrusher => 80.0,
            Self::RisingStar => 5.0,
            Self::Champion => 90.0,
            Self::Unstoppable => 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked: bool,
    /// `0..=100`.
    pub progress: f64,
}

#[must_use]
pub fn achievements(
    overall: &OverallStats,
    streaks: &StreakData,
    progression: Progression,
) -> Vec<Achievement> {
    AchievementKind::ALL
        .into_iter()
        .map(|kind| {
            let value = match kind {
                AchievementKind::FireStarter | AchievementKind::WeekWarrior => {
                    f64::from(streaks.current_streak)
                }
                AchievementKind::GoalCrusher | AchievementKind::Champion => {
                    overall.percentage
                }
                AchievementKind::RisingStar => f64::from(progression.level),
                AchievementKind::Unstoppable => f64::from(streaks.longest_streak),
            };
            let threshold = kind.threshold();
            Achievement {
                kind,
                unlocked: value >= threshold,
                progress: (value / threshold * 100.0).clamp(0.0, 100.0),
            }
        })
        .collect()
}

/// Overall stats against the dashboard target, for callers that only hold
/// courses.
#[must_use]
pub fn dashboard_overview(courses: &[Course]) -> OverallStats {
    OverallStats::from_courses(courses, DASHBOARD_TARGET)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

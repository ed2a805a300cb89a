//! Attendance threshold arithmetic.
//!
//! Every function here is total: degenerate input (no classes held yet, a
//! target of 0 or 100) yields 0 instead of an error so a half-filled form can
//! always be rendered.

use serde::{Deserialize, Serialize};

/// Target used when a course does not specify one.
pub const DEFAULT_TARGET: f64 = 75.0;

/// Width of the "Warning" band below the target, in percentage points.
pub const WARNING_BAND: f64 = 10.0;

/// Decimal places kept by [`percentage`].
pub const PERCENTAGE_DECIMALS: i32 = 2;

//
// ─── PERCENTAGE ────────────────────────────────────────────────────────────────
//

/// Attendance percentage in `[0, 100]` for `attended <= total`.
///
/// Returns `0.0` when no classes have been held. The value is rounded to two
/// decimal places; views that show fewer digits format at the edge.
///
/// # Examples
///
/// ```
/// # use attendance_core::threshold::percentage;
/// assert_eq!(percentage(75, 100), 75.0);
/// assert_eq!(percentage(0, 0), 0.0);
/// assert_eq!(percentage(1, 3), 33.33);
/// ```
#[must_use]
pub fn percentage(attended: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(f64::from(attended) / f64::from(total) * 100.0, PERCENTAGE_DECIMALS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Whether the rounded percentage meets `target`. Every "target met" decision
/// goes through here so tiers, margins and messages agree.
fn meets_target(attended: u32, total: u32, target: f64) -> bool {
    percentage(attended, total) >= target
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturating_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

//
// ─── CLASSES NEEDED ────────────────────────────────────────────────────────────
//

/// Minimum number of consecutive classes to attend to reach `target` percent.
///
/// Each extra class counts toward both `attended` and `total`, so this is the
/// smallest `x >= 0` with `(attended + x) / (total + x) >= target / 100`.
///
/// Returns `0` when no classes have been held, when the target is already
/// met, and when `target >= 100` (no finite number of classes reaches it).
///
/// # Examples
///
/// ```
/// # use attendance_core::threshold::classes_needed;
/// assert_eq!(classes_needed(50, 80, 75.0), 40);
/// assert_eq!(classes_needed(60, 80, 75.0), 0);
/// ```
#[must_use]
pub fn classes_needed(attended: u32, total: u32, target: f64) -> u32 {
    if total == 0 || !target.is_finite() || target >= 100.0 {
        return 0;
    }
    if meets_target(attended, total, target) {
        return 0;
    }

    let (a, t) = (f64::from(attended), f64::from(total));
    let estimate = ((target * t - 100.0 * a) / (100.0 - target)).ceil();
    let mut x = saturating_u32(estimate);
    let after = |x: u32| meets_target(attended.saturating_add(x), total.saturating_add(x), target);

    // The closed form ignores rounding; settle on the exact minimum.
    while x > 0 && after(x - 1) {
        x -= 1;
    }
    while x < u32::MAX && !after(x) {
        x += 1;
    }
    x
}

//
// ─── CLASSES CAN MISS ──────────────────────────────────────────────────────────
//

/// Maximum number of classes that can be skipped while staying at `target`.
///
/// Skipped classes only grow `total`, so this is the largest `x >= 0` with
/// `attended / (total + x) >= target / 100`.
///
/// Returns `0` when no classes have been held, when already below target, and
/// when `target <= 0` (every absence would keep the target met).
///
/// # Examples
///
/// ```
/// # use attendance_core::threshold::classes_can_miss;
/// assert_eq!(classes_can_miss(90, 100, 75.0), 20);
/// assert_eq!(classes_can_miss(60, 80, 75.0), 0);
/// ```
#[must_use]
pub fn classes_can_miss(attended: u32, total: u32, target: f64) -> u32 {
    if total == 0 || !target.is_finite() || target <= 0.0 {
        return 0;
    }
    if !meets_target(attended, total, target) {
        return 0;
    }

    let (a, t) = (f64::from(attended), f64::from(total));
    let estimate = (100.0 * a / target - t).floor();
    let mut x = saturating_u32(estimate);
    let after = |x: u32| meets_target(attended, total.saturating_add(x), target);

    while x > 0 && !after(x) {
        x -= 1;
    }
    while x < u32::MAX && after(x + 1) {
        x += 1;
    }
    x
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Three-tier classification relative to the student's own target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceTier {
    Safe,
    Warning,
    Critical,
}

impl AttendanceTier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Safe => "✅",
            Self::Warning => "⚠️",
            Self::Critical => "❌",
        }
    }
}

/// Label and tier for a percentage measured against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    tier: AttendanceTier,
}

impl StatusInfo {
    #[must_use]
    pub fn tier(&self) -> AttendanceTier {
        self.tier
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.tier.label()
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.tier.icon()
    }
}

/// Classify `percentage` against `target`.
///
/// `>= target` is Safe, within [`WARNING_BAND`] points below is Warning,
/// anything lower is Critical.
///
/// # Examples
///
/// ```
/// # use attendance_core::threshold::{status_info, AttendanceTier};
/// assert_eq!(status_info(70.0, 75.0).tier(), AttendanceTier::Warning);
/// assert_eq!(status_info(60.0, 75.0).tier(), AttendanceTier::Critical);
/// ```
#[must_use]
pub fn status_info(percentage: f64, target: f64) -> StatusInfo {
    let tier = if percentage >= target {
        AttendanceTier::Safe
    } else if percentage >= target - WARNING_BAND {
        AttendanceTier::Warning
    } else {
        AttendanceTier::Critical
    };
    StatusInfo { tier }
}

//
// ─── PREDICTIVE MESSAGE ────────────────────────────────────────────────────────
//

/// Human-readable advice for the current counts.
///
/// # Examples
///
/// ```
/// # use attendance_core::threshold::predictive_message;
/// assert_eq!(
///     predictive_message(90, 100, 75.0),
///     "Great! You can miss 20 more classes and still maintain 75% attendance."
/// );
/// ```
#[must_use]
pub fn predictive_message(attended: u32, total: u32, target: f64) -> String {
    let target_label = format_target(target);
    let at_or_above = (total == 0 && target <= 0.0)
        || (total > 0 && meets_target(attended, total, target));

    if at_or_above {
        let can_miss = classes_can_miss(attended, total, target);
        format!(
            "Great! You can miss {can_miss} more {} and still maintain {target_label}% attendance.",
            pluralize_class(can_miss)
        )
    } else if total > 0 && target >= 100.0 {
        format!(
            "You can no longer miss any class; {target_label}% attendance requires attending every class."
        )
    } else {
        let needed = classes_needed(attended, total, target);
        format!(
            "You need to attend the next {needed} {} consecutively to reach {target_label}% attendance.",
            pluralize_class(needed)
        )
    }
}

fn pluralize_class(count: u32) -> &'static str {
    if count == 1 { "class" } else { "classes" }
}

/// Render a target without a trailing `.0` when it is integral.
#[must_use]
pub fn format_target(target: f64) -> String {
    if target.is_finite() && target.fract() == 0.0 {
        format!("{target:.0}")
    } else {
        format!("{target}")
    }
}

/// Display-only formatting of a percentage with a fixed number of decimals.
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Raw counts plus target, with the derived metrics as methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceSnapshot {
    pub attended: u32,
    pub total: u32,
    pub target: f64,
}

impl AttendanceSnapshot {
    #[must_use]
    pub fn new(attended: u32, total: u32, target: f64) -> Self {
        Self {
            attended,
            total,
            target,
        }
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.attended, self.total)
    }

    #[must_use]
    pub fn classes_needed(&self) -> u32 {
        classes_needed(self.attended, self.total, self.target)
    }

    #[must_use]
    pub fn classes_can_miss(&self) -> u32 {
        classes_can_miss(self.attended, self.total, self.target)
    }

    #[must_use]
    pub fn status(&self) -> StatusInfo {
        status_info(self.percentage(), self.target)
    }

    #[must_use]
    pub fn predictive_message(&self) -> String {
        predictive_message(self.attended, self.total, self.target)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies_after_attending(attended: u32, total: u32, target: f64, x: u32) -> bool {
        percentage(attended + x, total + x) >= target
    }

    fn satisfies_after_missing(attended: u32, total: u32, target: f64, x: u32) -> bool {
        percentage(attended, total + x) >= target
    }

    #[test]
    fn percentage_handles_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_rounds_to_two_places() {
        assert_eq!(percentage(75, 100), 75.0);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(50, 80), 62.5);
    }

    #[test]
    fn percentage_stays_in_bounds() {
        for total in 0..60 {
            for attended in 0..=total {
                let value = percentage(attended, total);
                assert!((0.0..=100.0).contains(&value), "{attended}/{total} -> {value}");
            }
        }
    }

    #[test]
    fn scenario_exactly_at_target() {
        assert_eq!(percentage(60, 80), 75.0);
        assert_eq!(classes_needed(60, 80, 75.0), 0);
        assert_eq!(classes_can_miss(60, 80, 75.0), 0);
    }

    #[test]
    fn scenario_below_target() {
        assert_eq!(percentage(50, 80), 62.5);
        assert_eq!(classes_needed(50, 80, 75.0), 40);
    }

    #[test]
    fn scenario_above_target() {
        assert_eq!(percentage(90, 100), 90.0);
        assert_eq!(classes_can_miss(90, 100, 75.0), 20);
    }

    #[test]
    fn rounded_up_to_target_counts_as_met() {
        // 29999/40001 is 74.9956%, which rounds to 75.00.
        assert_eq!(percentage(29_999, 40_001), 75.0);
        assert_eq!(status_info(percentage(29_999, 40_001), 75.0).tier(), AttendanceTier::Safe);
        assert_eq!(classes_needed(29_999, 40_001, 75.0), 0);
        assert_eq!(classes_can_miss(29_999, 40_001, 75.0), 0);
        assert!(predictive_message(29_999, 40_001, 75.0).starts_with("Great!"));

        assert_eq!(percentage(3_752, 5_003), 75.0);
        assert_eq!(classes_needed(3_752, 5_003, 75.0), 0);
    }

    #[test]
    fn large_totals_stay_consistent_with_rounded_percentage() {
        for total in [5_001_u32, 12_345, 40_000, 99_999] {
            for target in [60.0, 75.0, 85.0] {
                let pivot = (f64::from(total) * target / 100.0) as u32;
                for attended in pivot.saturating_sub(3)..=(pivot + 3).min(total) {
                    let met = percentage(attended, total) >= target;
                    let needed = classes_needed(attended, total, target);
                    assert_eq!(met, needed == 0, "{attended}/{total}@{target}");
                    if needed > 0 {
                        assert!(satisfies_after_attending(attended, total, target, needed));
                        assert!(!satisfies_after_attending(attended, total, target, needed - 1));
                    }
                    let message = predictive_message(attended, total, target);
                    assert_eq!(message.starts_with("Great!"), met, "{message}");
                }
            }
        }
    }

    #[test]
    fn classes_needed_is_minimal() {
        for target in [50.0, 65.0, 75.0, 80.0, 85.0, 90.0, 95.0, 99.0, 72.5] {
            for total in 1..40 {
                for attended in 0..=total {
                    let x = classes_needed(attended, total, target);
                    assert!(
                        satisfies_after_attending(attended, total, target, x),
                        "{attended}/{total}@{target}: {x} does not reach target"
                    );
                    if x > 0 {
                        assert!(
                            !satisfies_after_attending(attended, total, target, x - 1),
                            "{attended}/{total}@{target}: {x} is not minimal"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn classes_can_miss_is_maximal() {
        for target in [50.0, 65.0, 75.0, 80.0, 85.0, 90.0, 95.0, 1.0, 72.5] {
            for total in 1..40 {
                for attended in 0..=total {
                    if !satisfies_after_missing(attended, total, target, 0) {
                        assert_eq!(classes_can_miss(attended, total, target), 0);
                        continue;
                    }
                    let x = classes_can_miss(attended, total, target);
                    assert!(satisfies_after_missing(attended, total, target, x));
                    assert!(
                        !satisfies_after_missing(attended, total, target, x + 1),
                        "{attended}/{total}@{target}: {x} is not maximal"
                    );
                }
            }
        }
    }

    #[test]
    fn classes_needed_is_zero_whenever_target_met() {
        for total in 1..30 {
            for attended in 0..=total {
                if percentage(attended, total) >= 75.0 {
                    assert_eq!(classes_needed(attended, total, 75.0), 0);
                }
            }
        }
    }

    #[test]
    fn degenerate_targets_return_zero() {
        assert_eq!(classes_needed(3, 10, 100.0), 0);
        assert_eq!(classes_needed(3, 10, f64::NAN), 0);
        assert_eq!(classes_can_miss(3, 10, 0.0), 0);
        assert_eq!(classes_can_miss(3, 10, -5.0), 0);
        assert_eq!(classes_needed(0, 0, 75.0), 0);
        assert_eq!(classes_can_miss(0, 0, 75.0), 0);
    }

    #[test]
    fn status_is_relative_to_target() {
        assert_eq!(status_info(70.0, 75.0).label(), "Warning");
        assert_eq!(status_info(60.0, 75.0).label(), "Critical");
        assert_eq!(status_info(75.0, 75.0).label(), "Safe");
        assert_eq!(status_info(65.0, 75.0).label(), "Warning");
        // a student aiming for 90 is not safe at 80
        assert_eq!(status_info(80.0, 90.0).tier(), AttendanceTier::Warning);
        assert_eq!(status_info(62.0, 60.0).tier(), AttendanceTier::Safe);
    }

    #[test]
    fn predictive_message_above_target() {
        assert_eq!(
            predictive_message(90, 100, 75.0),
            "Great! You can miss 20 more classes and still maintain 75% attendance."
        );
    }

    #[test]
    fn predictive_message_singular_class() {
        // 4/5 = 80%, missing one more gives 4/6 = 66.7% < 75
        assert_eq!(
            predictive_message(4, 5, 75.0),
            "Great! You can miss 0 more classes and still maintain 75% attendance."
        );
        // 2/3 = 66.7%, attending one more gives 3/4 = 75%
        assert_eq!(
            predictive_message(2, 3, 75.0),
            "You need to attend the next 1 class consecutively to reach 75% attendance."
        );
    }

    #[test]
    fn predictive_message_below_target() {
        assert_eq!(
            predictive_message(50, 80, 75.0),
            "You need to attend the next 40 classes consecutively to reach 75% attendance."
        );
    }

    #[test]
    fn predictive_message_unreachable_target() {
        assert_eq!(
            predictive_message(9, 10, 100.0),
            "You can no longer miss any class; 100% attendance requires attending every class."
        );
    }

    #[test]
    fn predictive_message_with_fractional_target() {
        assert!(predictive_message(1, 10, 72.5).contains("72.5%"));
    }

    #[test]
    fn predictive_message_with_no_classes() {
        assert_eq!(
            predictive_message(0, 0, 75.0),
            "You need to attend the next 0 classes consecutively to reach 75% attendance."
        );
    }

    #[test]
    fn snapshot_matches_free_functions() {
        let snapshot = AttendanceSnapshot::new(50, 80, 75.0);
        assert_eq!(snapshot.percentage(), 62.5);
        assert_eq!(snapshot.classes_needed(), 40);
        assert_eq!(snapshot.classes_can_miss(), 0);
        assert_eq!(snapshot.status().tier(), AttendanceTier::Critical);
    }

    #[test]
    fn format_percentage_is_display_only() {
        assert_eq!(format_percentage(66.67, 1), "66.7");
        assert_eq!(format_percentage(75.0, 2), "75.00");
    }
}

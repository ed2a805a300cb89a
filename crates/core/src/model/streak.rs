use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreakError {
    #[error("enter a goal name")]
    EmptyGoalName,

    #[error("weekly goal must be greater than zero")]
    InvalidWeeklyGoal,

    #[error("custom goal not found")]
    GoalNotFound,
}

/// A free-form goal tracked on the streaks page, progress in whole percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGoal {
    pub id: u64,
    pub name: String,
    pub target: u8,
    pub progress: u8,
    pub completed: bool,
}

/// Manually maintained streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_goal: u32,
    pub weekly_progress: u32,
    pub last_attendance_date: Option<NaiveDate>,
    pub custom_goals: Vec<CustomGoal>,
}

impl Default for StreakData {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            weekly_goal: 5,
            weekly_progress: 0,
            last_attendance_date: None,
            custom_goals: Vec::new(),
        }
    }
}

impl StreakData {
    /// Count one more attended day.
    pub fn increment(&mut self, today: NaiveDate) {
        self.current_streak = self.current_streak.saturating_add(1);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.weekly_progress = self.weekly_progress.saturating_add(1).min(self.weekly_goal);
        self.last_attendance_date = Some(today);
    }

    /// Undo one day. The longest streak is history and stays.
    pub fn decrement(&mut self) {
        if self.current_streak > 0 {
            self.current_streak -= 1;
            self.weekly_progress = self.weekly_progress.saturating_sub(1);
        }
    }

    /// Overwrite counters from the edit form.
    ///
    /// # Errors
    ///
    /// Returns `StreakError::InvalidWeeklyGoal` when `weekly_goal == 0`.
    pub fn edit(
        &mut self,
        current_streak: u32,
        longest_streak: u32,
        weekly_goal: u32,
        weekly_progress: u32,
    ) -> Result<(), StreakError> {
        if weekly_goal == 0 {
            return Err(StreakError::InvalidWeeklyGoal);
        }
        self.current_streak = current_streak;
        self.longest_streak = longest_streak.max(current_streak);
        self.weekly_goal = weekly_goal;
        self.weekly_progress = weekly_progress.min(weekly_goal);
        Ok(())
    }

    /// Clear counters and custom goals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// # Errors
    ///
    /// Returns `StreakError::EmptyGoalName` for a blank name.
    pub fn add_custom_goal(&mut self, id: u64, name: &str, target: u8) -> Result<(), StreakError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StreakError::EmptyGoalName);
        }
        self.custom_goals.push(CustomGoal {
            id,
            name: name.to_owned(),
            target: target.min(100),
            progress: 0,
            completed: false,
        });
        Ok(())
    }

    /// Move a custom goal's progress by `delta` points, clamped to `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns `StreakError::GoalNotFound` for an unknown id.
    pub fn adjust_custom_goal(&mut self, id: u64, delta: i16) -> Result<(), StreakError> {
        let goal = self
            .custom_goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or(StreakError::GoalNotFound)?;
        let next = (i16::from(goal.progress) + delta).clamp(0, 100);
        goal.progress = u8::try_from(next).unwrap_or(100);
        goal.completed = goal.progress >= goal.target;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StreakError::GoalNotFound` for an unknown id.
    pub fn remove_custom_goal(&mut self, id: u64) -> Result<(), StreakError> {
        let before = self.custom_goals.len();
        self.custom_goals.retain(|goal| goal.id != id);
        if self.custom_goals.len() == before {
            return Err(StreakError::GoalNotFound);
        }
        Ok(())
    }

    #[must_use]
    pub fn next_custom_goal_id(&self) -> u64 {
        self.custom_goals.iter().map(|g| g.id).max().unwrap_or(0) + 1
    }

    /// Weekly progress as a percentage of the weekly goal, capped at 100.
    #[must_use]
    pub fn weekly_percentage(&self) -> f64 {
        if self.weekly_goal == 0 {
            return 0.0;
        }
        (f64::from(self.weekly_progress) / f64::from(self.weekly_goal) * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn increment_tracks_longest_and_caps_weekly() {
        let mut data = StreakData::default();
        for d in 1..=7 {
            data.increment(day(d));
        }
        assert_eq!(data.current_streak, 7);
        assert_eq!(data.longest_streak, 7);
        assert_eq!(data.weekly_progress, 5);
        assert_eq!(data.last_attendance_date, Some(day(7)));
    }

    #[test]
    fn decrement_keeps_longest() {
        let mut data = StreakData::default();
        data.increment(day(1));
        data.increment(day(2));
        data.decrement();
        assert_eq!(data.current_streak, 1);
        assert_eq!(data.longest_streak, 2);
        assert_eq!(data.weekly_progress, 1);

        data.decrement();
        data.decrement();
        assert_eq!(data.current_streak, 0);
    }

    #[test]
    fn edit_normalizes_values() {
        let mut data = StreakData::default();
        data.edit(10, 4, 3, 9).unwrap();
        assert_eq!(data.longest_streak, 10);
        assert_eq!(data.weekly_progress, 3);
        assert_eq!(data.edit(1, 1, 0, 0), Err(StreakError::InvalidWeeklyGoal));
    }

    #[test]
    fn custom_goal_progress_is_clamped() {
        let mut data = StreakData::default();
        let id = data.next_custom_goal_id();
        data.add_custom_goal(id, "Read notes", 75).unwrap();

        data.adjust_custom_goal(id, 50).unwrap();
        assert!(!data.custom_goals[0].completed);
        data.adjust_custom_goal(id, 40).unwrap();
        assert_eq!(data.custom_goals[0].progress, 90);
        assert!(data.custom_goals[0].completed);
        data.adjust_custom_goal(id, 40).unwrap();
        assert_eq!(data.custom_goals[0].progress, 100);
        data.adjust_custom_goal(id, -120).unwrap();
        assert_eq!(data.custom_goals[0].progress, 0);
        assert!(!data.custom_goals[0].completed);
    }

    #[test]
    fn custom_goal_errors() {
        let mut data = StreakData::default();
        assert_eq!(data.add_custom_goal(1, " ", 50), Err(StreakError::EmptyGoalName));
        assert_eq!(data.adjust_custom_goal(9, 10), Err(StreakError::GoalNotFound));
        assert_eq!(data.remove_custom_goal(9), Err(StreakError::GoalNotFound));
    }

    #[test]
    fn deserializes_partial_payload_with_defaults() {
        let data: StreakData = serde_json::from_str(r#"{"currentStreak":4}"#).unwrap();
        assert_eq!(data.current_streak, 4);
        assert_eq!(data.weekly_goal, 5);
        assert!(data.custom_goals.is_empty());
    }
}

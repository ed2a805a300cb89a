use attendance_core::model::{CustomGoal, StreakData};
use attendance_core::stats::{OverallStats, Progression, XP_PER_LEVEL, achievements};
use attendance_core::threshold::format_percentage;

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq)]
pub struct AchievementVm {
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    pub progress: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomGoalVm {
    pub id: u64,
    pub name: String,
    pub progress: u8,
    pub target: u8,
    pub completed: bool,
}

impl From<&CustomGoal> for CustomGoalVm {
    fn from(goal: &CustomGoal) -> Self {
        Self {
            id: goal.id,
            name: goal.name.clone(),
            progress: goal.progress,
            target: goal.target,
            completed: goal.completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreaksVm {
    pub current: u32,
    pub longest: u32,
    pub weekly_str: String,
    pub weekly_percentage: f64,
    pub last_attended: String,
    pub level: u32,
    pub xp_str: String,
    pub level_progress: f64,
    pub achievements: Vec<AchievementVm>,
    pub unlocked_count: usize,
    pub custom_goals: Vec<CustomGoalVm>,
}

#[must_use]
pub fn map_streaks(data: &StreakData, overall: &OverallStats) -> StreaksVm {
    let progression = Progression::compute(overall, data);
    let achievements: Vec<AchievementVm> = achievements(overall, data, progression)
        .into_iter()
        .map(|a| AchievementVm {
            title: a.kind.title(),
            description: a.kind.description(),
            unlocked: a.unlocked,
            progress: a.progress,
        })
        .collect();
    let unlocked_count = achievements.iter().filter(|a| a.unlocked).count();

    StreaksVm {
        current: data.current_streak,
        longest: data.longest_streak,
        weekly_str: format!("{}/{}", data.weekly_progress, data.weekly_goal),
        weekly_percentage: data.weekly_percentage(),
        last_attended: data
            .last_attendance_date
            .map_or_else(|| "Never".to_owned(), format_date),
        level: progression.level,
        xp_str: format!("{} / {XP_PER_LEVEL} XP", progression.xp_into_level()),
        level_progress: f64::from(progression.xp_into_level()) / f64::from(XP_PER_LEVEL) * 100.0,
        achievements,
        unlocked_count,
        custom_goals: data.custom_goals.iter().map(CustomGoalVm::from).collect(),
    }
}

impl StreaksVm {
    #[must_use]
    pub fn weekly_label(&self) -> String {
        format!("{}%", format_percentage(self.weekly_percentage, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fresh_data_starts_at_level_one() {
        let overall = OverallStats::from_courses(&[], 80.0);
        let vm = map_streaks(&StreakData::default(), &overall);
        assert_eq!(vm.level, 1);
        assert_eq!(vm.xp_str, "0 / 200 XP");
        assert_eq!(vm.last_attended, "Never");
        assert_eq!(vm.achievements.len(), 6);
        assert_eq!(vm.unlocked_count, 0);
        assert_eq!(vm.weekly_str, "0/5");
    }

    #[test]
    fn streak_unlocks_starter() {
        let overall = OverallStats::from_courses(&[], 80.0);
        let mut data = StreakData::default();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for _ in 0..3 {
            data.increment(day);
        }
        let vm = map_streaks(&data, &overall);
        assert!(vm.achievements[0].unlocked);
        assert_eq!(vm.xp_str, "60 / 200 XP");
        assert_eq!(vm.weekly_label(), "60%");
    }
}

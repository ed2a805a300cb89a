use std::sync::Arc;

use attendance_core::model::{StreakData, StreakError};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::LocalDataError;
use crate::local_store::{load_or_default, save};

pub const STREAKS_KEY: &str = "attendance_streaks_data";

/// Manually tracked streak counters and custom goals.
#[derive(Clone)]
pub struct StreakService {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
}

impl StreakService {
    #[must_use]
    pub fn new(clock: Clock, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, kv }
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<StreakData, LocalDataError> {
        load_or_default(self.kv.as_ref(), STREAKS_KEY).await
    }

    async fn update(
        &self,
        apply: impl FnOnce(&mut StreakData) -> Result<(), StreakError> + Send,
    ) -> Result<StreakData, LocalDataError> {
        let mut data = self.load().await?;
        apply(&mut data)?;
        save(self.kv.as_ref(), STREAKS_KEY, &data).await?;
        Ok(data)
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` on backend failure.
    pub async fn increment(&self) -> Result<StreakData, LocalDataError> {
        let today = self.clock.today();
        self.update(|data| {
            data.increment(today);
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` on backend failure.
    pub async fn decrement(&self) -> Result<StreakData, LocalDataError> {
        self.update(|data| {
            data.decrement();
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Streak` for a zero weekly goal.
    pub async fn edit(
        &self,
        current: u32,
        longest: u32,
        weekly_goal: u32,
        weekly_progress: u32,
    ) -> Result<StreakData, LocalDataError> {
        self.update(|data| data.edit(current, longest, weekly_goal, weekly_progress))
            .await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` on backend failure.
    pub async fn reset(&self) -> Result<StreakData, LocalDataError> {
        let data = StreakData::default();
        save(self.kv.as_ref(), STREAKS_KEY, &data).await?;
        tracing::info!("streaks reset");
        Ok(data)
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Streak` for a blank name.
    pub async fn add_custom_goal(&self, name: &str, target: u8) -> Result<StreakData, LocalDataError> {
        let name = name.to_owned();
        self.update(move |data| {
            let id = data.next_custom_goal_id();
            data.add_custom_goal(id, &name, target)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Streak` for an unknown id.
    pub async fn adjust_custom_goal(&self, id: u64, delta: i16) -> Result<StreakData, LocalDataError> {
        self.update(|data| data.adjust_custom_goal(id, delta)).await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Streak` for an unknown id.
    pub async fn remove_custom_goal(&self, id: u64) -> Result<StreakData, LocalDataError> {
        self.update(|data| data.remove_custom_goal(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::time::fixed_now;
    use storage::repository::InMemoryKeyValueStore;

    fn service() -> StreakService {
        StreakService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryKeyValueStore::new()),
        )
    }

    #[tokio::test]
    async fn increments_persist() {
        let service = service();
        service.increment().await.unwrap();
        let data = service.increment().await.unwrap();
        assert_eq!(data.current_streak, 2);
        assert_eq!(service.load().await.unwrap().longest_streak, 2);
        assert_eq!(data.last_attendance_date, Some(fixed_now().date_naive()));
    }

    #[tokio::test]
    async fn failed_edit_leaves_data_untouched() {
        let service = service();
        service.increment().await.unwrap();
        let err = service.edit(9, 9, 0, 0).await.unwrap_err();
        assert!(matches!(
            err,
            LocalDataError::Streak(StreakError::InvalidWeeklyGoal)
        ));
        assert_eq!(service.load().await.unwrap().current_streak, 1);
    }

    #[tokio::test]
    async fn custom_goal_lifecycle() {
        let service = service();
        let data = service.add_custom_goal("Review notes", 60).await.unwrap();
        let id = data.custom_goals[0].id;
        let data = service.adjust_custom_goal(id, 10).await.unwrap();
        assert_eq!(data.custom_goals[0].progress, 10);
        let data = service.remove_custom_goal(id).await.unwrap();
        assert!(data.custom_goals.is_empty());

        let data = service.reset().await.unwrap();
        assert_eq!(data, StreakData::default());
    }
}

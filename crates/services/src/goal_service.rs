use std::sync::Arc;

use attendance_core::model::{Goal, GoalDraft, GoalError, GoalId, UserId};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::LocalDataError;
use crate::local_store::{load_or_default, save};

fn goals_key(user: UserId) -> String {
    format!("goals_{user}")
}

/// Per-user goals stored on this device.
#[derive(Clone)]
pub struct GoalService {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
}

impl GoalService {
    #[must_use]
    pub fn new(clock: Clock, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, kv }
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` if the store cannot be read.
    pub async fn list(&self, user: UserId) -> Result<Vec<Goal>, LocalDataError> {
        load_or_default(self.kv.as_ref(), &goals_key(user)).await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Goal` for invalid input, or
    /// `LocalDataError::Storage` on backend failure.
    pub async fn add(&self, user: UserId, draft: GoalDraft) -> Result<Goal, LocalDataError> {
        let mut goals = self.list(user).await?;
        let next = goals.iter().map(|g| g.id.value()).max().unwrap_or(0) + 1;
        let goal = Goal::new(GoalId::new(next), draft, self.clock.now())?;
        goals.push(goal.clone());
        save(self.kv.as_ref(), &goals_key(user), &goals).await?;
        tracing::info!(goal_id = %goal.id, "goal added");
        Ok(goal)
    }

    /// Flip a goal between open and completed.
    ///
    /// # Errors
    ///
    /// Returns `LocalDataError::Goal` for an unknown id.
    pub async fn toggle_complete(&self, user: UserId, id: GoalId) -> Result<Goal, LocalDataError> {
        let mut goals = self.list(user).await?;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(GoalError::NotFound)?;
        goal.completed = !goal.completed;
        let toggled = goal.clone();
        save(self.kv.as_ref(), &goals_key(user), &goals).await?;
        Ok(toggled)
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Goal` for an unknown id.
    pub async fn delete(&self, user: UserId, id: GoalId) -> Result<(), LocalDataError> {
        let mut goals = self.list(user).await?;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        if goals.len() == before {
            return Err(GoalError::NotFound.into());
        }
        save(self.kv.as_ref(), &goals_key(user), &goals).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::time::fixed_now;
    use storage::repository::InMemoryKeyValueStore;

    fn service() -> (GoalService, InMemoryKeyValueStore) {
        let kv = InMemoryKeyValueStore::new();
        (
            GoalService::new(Clock::Fixed(fixed_now()), Arc::new(kv.clone())),
            kv,
        )
    }

    fn draft(title: &str) -> GoalDraft {
        GoalDraft {
            title: title.into(),
            ..GoalDraft::default()
        }
    }

    #[tokio::test]
    async fn goals_are_scoped_per_user_key() {
        let (service, kv) = service();
        let user = UserId::new(4);
        let goal = service.add(user, draft("Reach 80%")).await.unwrap();
        assert_eq!(goal.id, GoalId::new(1));

        assert!(kv.get("goals_4").await.unwrap().is_some());
        assert!(service.list(UserId::new(5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_and_delete() {
        let (service, _) = service();
        let user = UserId::new(1);
        let first = service.add(user, draft("One")).await.unwrap();
        let second = service.add(user, draft("Two")).await.unwrap();
        assert_eq!(second.id, GoalId::new(2));

        let toggled = service.toggle_complete(user, first.id).await.unwrap();
        assert!(toggled.completed);

        service.delete(user, first.id).await.unwrap();
        let remaining = service.list(user).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(
            service.delete(user, first.id).await,
            Err(LocalDataError::Goal(GoalError::NotFound))
        ));
    }
}

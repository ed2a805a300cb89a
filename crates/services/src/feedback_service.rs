use std::sync::Arc;

use attendance_core::model::{
    APP_VERSION, DAILY_SUBMISSION_CAP, Feedback, FeedbackDraft, FeedbackError, FeedbackId,
    FeedbackStatus, UserId,
};
use chrono::{DateTime, Utc};
use storage::repository::{FeedbackRepository, NewFeedbackRecord};

use crate::Clock;
use crate::error::FeedbackServiceError;

/// Bug reports and suggestions, with a per-day submission cap.
#[derive(Clone)]
pub struct FeedbackService {
    clock: Clock,
    feedback: Arc<dyn FeedbackRepository>,
    platform: String,
}

impl FeedbackService {
    #[must_use]
    pub fn new(clock: Clock, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            clock,
            feedback,
            platform: std::env::consts::OS.to_owned(),
        }
    }

    fn start_of_day(&self) -> DateTime<Utc> {
        self.clock.today().and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Submissions left for `user` today.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Storage` if repository access fails.
    pub async fn remaining_today(&self, user: UserId) -> Result<u32, FeedbackServiceError> {
        let used = self.feedback.count_since(user, self.start_of_day()).await?;
        Ok(DAILY_SUBMISSION_CAP.saturating_sub(used))
    }

    /// Validate and store a report as `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Feedback` for invalid input or when the
    /// daily cap is reached, or `FeedbackServiceError::Storage` on backend
    /// failure.
    pub async fn submit(
        &self,
        user: UserId,
        draft: FeedbackDraft,
    ) -> Result<Feedback, FeedbackServiceError> {
        let valid = draft
            .validate()
            .inspect_err(|err| tracing::warn!(%err, "rejected feedback"))?;

        if self.remaining_today(user).await? == 0 {
            tracing::warn!(user = %user, "daily feedback limit reached");
            return Err(FeedbackError::DailyLimitReached.into());
        }

        let record =
            NewFeedbackRecord::from_valid(user, valid, &self.platform, APP_VERSION, self.clock.now());
        let id = self.feedback.insert_feedback(record).await?;
        tracing::info!(feedback_id = %id, "feedback submitted");
        Ok(self.feedback.get_feedback(id).await?)
    }

    /// Reports of `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Storage` if repository access fails.
    pub async fn history(&self, user: UserId) -> Result<Vec<Feedback>, FeedbackServiceError> {
        Ok(self.feedback.list_feedback(user).await?)
    }

    /// Move a report forward in the review workflow.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::InvalidTransition` (wrapped) for backwards or
    /// repeated moves, or `FeedbackServiceError::Storage` if the report is
    /// missing.
    pub async fn update_status(
        &self,
        id: FeedbackId,
        status: FeedbackStatus,
    ) -> Result<Feedback, FeedbackServiceError> {
        let current = self.feedback.get_feedback(id).await?;
        if !current.status.can_transition_to(status) {
            return Err(FeedbackError::InvalidTransition {
                from: current.status,
                to: status,
            }
            .into());
        }
        let updated = self
            .feedback
            .update_status(id, status, self.clock.now())
            .await?;
        tracing::info!(feedback_id = %id, status = %status, "feedback status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use attendance_core::time::fixed_now;
    use chrono::Duration;
    use storage::repository::InMemoryRepository;

    fn draft(n: usize) -> FeedbackDraft {
        FeedbackDraft {
            subject: format!("Report {n}"),
            description: "Something on the dashboard looks off today.".into(),
            ..FeedbackDraft::default()
        }
    }

    #[tokio::test]
    async fn submit_records_pending_with_version() {
        let service = FeedbackService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        );
        let user = UserId::new(1);
        let stored = service.submit(user, draft(1)).await.unwrap();
        assert_eq!(stored.status, FeedbackStatus::Pending);
        assert_eq!(stored.app_version, APP_VERSION);
        assert_eq!(service.history(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn daily_cap_resets_next_day() {
        let repo = Arc::new(InMemoryRepository::new());
        let user = UserId::new(1);
        let service = FeedbackService::new(Clock::Fixed(fixed_now()), repo.clone());
        for n in 0..DAILY_SUBMISSION_CAP {
            service.submit(user, draft(n as usize)).await.unwrap();
        }
        assert_eq!(service.remaining_today(user).await.unwrap(), 0);
        let err = service.submit(user, draft(99)).await.unwrap_err();
        assert!(matches!(
            err,
            FeedbackServiceError::Feedback(FeedbackError::DailyLimitReached)
        ));

        let tomorrow = FeedbackService::new(
            Clock::Fixed(fixed_now() + Duration::days(1)),
            repo,
        );
        assert!(tomorrow.submit(user, draft(100)).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_draft_is_not_stored() {
        let service = FeedbackService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        );
        let user = UserId::new(1);
        let short = FeedbackDraft {
            subject: "Hi".into(),
            description: "short".into(),
            ..FeedbackDraft::default()
        };
        assert!(service.submit(user, short).await.is_err());
        assert!(service.history(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_moves_forward_only() {
        let service = FeedbackService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        );
        let stored = service.submit(UserId::new(1), draft(1)).await.unwrap();
        let reviewed = service
            .update_status(stored.id, FeedbackStatus::UnderReview)
            .await
            .unwrap();
        assert_eq!(reviewed.status, FeedbackStatus::UnderReview);

        let err = service
            .update_status(stored.id, FeedbackStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FeedbackServiceError::Feedback(FeedbackError::InvalidTransition { .. })
        ));
    }
}

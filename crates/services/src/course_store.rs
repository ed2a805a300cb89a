//! Cached course list for the signed-in user.
//!
//! Every mutation goes to storage first; the cache only changes after the
//! write succeeded. Each call yields a [`Notice`] for the toast area.

use std::sync::{Arc, Mutex, PoisonError};

use attendance_core::model::{Course, CourseDraft, CourseId, UserId};

use crate::auth_service::AuthService;
use crate::course_service::CourseService;
use crate::error::CourseServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short user-facing outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_owned(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.to_owned(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseState {
    pub courses: Vec<Course>,
    pub loaded: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CourseStore {
    auth: AuthService,
    service: CourseService,
    state: Arc<Mutex<CourseState>>,
}

impl CourseStore {
    #[must_use]
    pub fn new(auth: AuthService, service: CourseService) -> Self {
        Self {
            auth,
            service,
            state: Arc::new(Mutex::new(CourseState::default())),
        }
    }

    /// Copy of the cached state.
    #[must_use]
    pub fn snapshot(&self) -> CourseState {
        self.lock().clone()
    }

    #[must_use]
    pub fn courses(&self) -> Vec<Course> {
        self.lock().courses.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CourseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owner(&self) -> Option<UserId> {
        self.auth.current_user().map(|u| u.id)
    }

    /// Validation failures are shown as-is; storage failures get the generic `fallback`.
    fn fail(&self, fallback: &str, err: &CourseServiceError) -> Notice {
        self.lock().error = Some(err.to_string());
        match err {
            CourseServiceError::Course(invalid) => {
                tracing::warn!(%invalid, "{fallback}");
                Notice {
                    kind: NoticeKind::Error,
                    message: sentence_case(&invalid.to_string()),
                }
            }
            _ => {
                tracing::error!(%err, "{fallback}");
                Notice::error(fallback)
            }
        }
    }

    /// Reload the list from storage.
    pub async fn fetch(&self) -> Option<Notice> {
        let Some(owner) = self.owner() else {
            *self.lock() = CourseState::default();
            return None;
        };
        match self.service.list_courses(owner).await {
            Ok(courses) => {
                *self.lock() = CourseState {
                    courses,
                    loaded: true,
                    error: None,
                };
                None
            }
            Err(err) => Some(self.fail("Failed to fetch courses", &err)),
        }
    }

    pub async fn add(&self, draft: CourseDraft) -> Notice {
        const FAILED: &str = "Failed to add course";
        let Some(owner) = self.owner() else {
            return Notice::error(FAILED);
        };
        match self.service.create_course(owner, draft).await {
            Ok(course) => {
                let mut state = self.lock();
                state.courses.insert(0, course);
                state.error = None;
                Notice::success("Course added successfully")
            }
            Err(err) => self.fail(FAILED, &err),
        }
    }

    pub async fn update(&self, id: CourseId, draft: CourseDraft) -> Notice {
        const FAILED: &str = "Failed to update course";
        let Some(owner) = self.owner() else {
            return Notice::error(FAILED);
        };
        match self.service.update_course(owner, id, draft).await {
            Ok(course) => {
                self.replace(course);
                Notice::success("Course updated successfully")
            }
            Err(err) => self.fail(FAILED, &err),
        }
    }

    pub async fn remove(&self, id: CourseId) -> Notice {
        const FAILED: &str = "Failed to delete course";
        let Some(owner) = self.owner() else {
            return Notice::error(FAILED);
        };
        match self.service.delete_course(owner, id).await {
            Ok(()) => {
                self.lock().courses.retain(|c| c.id() != id);
                Notice::success("Course deleted successfully")
            }
            Err(err) => self.fail(FAILED, &err),
        }
    }

    /// Quick +1 attended (or missed) from the course card.
    pub async fn increment_attendance(&self, id: CourseId, attended: bool) -> Notice {
        const FAILED: &str = "Failed to update course";
        let Some(owner) = self.owner() else {
            return Notice::error(FAILED);
        };
        match self.service.increment_attendance(owner, id, attended).await {
            Ok(course) => {
                self.replace(course);
                Notice::success("Course updated successfully")
            }
            Err(err) => self.fail(FAILED, &err),
        }
    }

    fn replace(&self, course: Course) {
        let mut state = self.lock();
        if let Some(slot) = state.courses.iter_mut().find(|c| c.id() == course.id()) {
            *slot = course;
        }
        state.error = None;
    }
}

fn sentence_case(message: &str) -> String {
    let mut chars = message.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Clock;
    use attendance_core::model::ProfileDraft;
    use attendance_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn signed_in_store() -> CourseStore {
        let repo = Arc::new(InMemoryRepository::new());
        let clock = Clock::Fixed(fixed_now());
        let auth = AuthService::new(clock, repo.clone());
        auth.sign_up(
            ProfileDraft {
                name: "Asha Rao".into(),
                email: "asha@uni.edu".into(),
                roll_number: "21CS042".into(),
                university: None,
            },
            "secret1",
            "secret1",
        )
        .await
        .unwrap();
        CourseStore::new(auth, CourseService::new(clock, repo))
    }

    fn draft(code: &str, attended: u32, total: u32) -> CourseDraft {
        CourseDraft {
            code: code.into(),
            name: "Algorithms".into(),
            classes_attended: attended,
            total_classes: total,
            ..CourseDraft::default()
        }
    }

    #[tokio::test]
    async fn add_prepends_and_reports_success() {
        let store = signed_in_store().await;
        assert_eq!(store.fetch().await, None);
        assert!(store.snapshot().loaded);

        let notice = store.add(draft("CS1", 1, 2)).await;
        assert_eq!(notice.message, "Course added successfully");
        store.add(draft("CS2", 1, 2)).await;
        assert_eq!(store.courses()[0].code(), "CS2");
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_unchanged() {
        let store = signed_in_store().await;
        store.add(draft("CS1", 1, 2)).await;
        let id = store.courses()[0].id();

        let notice = store.update(id, draft("CS1", 5, 2)).await;
        assert!(notice.is_error());
        assert_eq!(notice.message, "Classes attended cannot exceed total classes");
        assert_eq!(store.courses()[0].classes_attended(), 1);
        assert!(store.snapshot().error.is_some());

        let notice = store.increment_attendance(id, true).await;
        assert!(!notice.is_error());
        assert_eq!(store.courses()[0].classes_attended(), 2);

        assert_eq!(store.remove(id).await.message, "Course deleted successfully");
        assert!(store.courses().is_empty());
    }

    #[tokio::test]
    async fn signed_out_store_is_empty() {
        let store = signed_in_store().await;
        store.add(draft("CS1", 1, 2)).await;
        store.auth.sign_out();
        assert_eq!(store.fetch().await, None);
        assert!(store.courses().is_empty());
        assert!(store.add(draft("CS3", 0, 0)).await.is_error());
    }
}

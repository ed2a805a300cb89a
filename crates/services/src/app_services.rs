use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::attendance_service::AttendanceService;
use crate::auth_service::AuthService;
use crate::course_service::CourseService;
use crate::course_store::CourseStore;
use crate::error::AppServicesError;
use crate::feedback_service::FeedbackService;
use crate::goal_service::GoalService;
use crate::preferences_service::PreferencesService;
use crate::stats_service::StatsService;
use crate::streak_service::StreakService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    auth: AuthService,
    courses: Arc<CourseService>,
    course_store: CourseStore,
    attendance: Arc<AttendanceService>,
    stats: Arc<StatsService>,
    feedback: Arc<FeedbackService>,
    goals: Arc<GoalService>,
    streaks: Arc<StreakService>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::info!(db_url, "storage ready");
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over volatile in-memory storage.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let auth = AuthService::new(clock, Arc::clone(&storage.users));
        let courses = CourseService::new(clock, Arc::clone(&storage.courses));
        let course_store = CourseStore::new(auth.clone(), courses.clone());

        Self {
            course_store,
            courses: Arc::new(courses),
            attendance: Arc::new(AttendanceService::new(
                clock,
                Arc::clone(&storage.attendance),
                Arc::clone(&storage.courses),
            )),
            stats: Arc::new(StatsService::new(
                Arc::clone(&storage.courses),
                Arc::clone(&storage.attendance),
            )),
            feedback: Arc::new(FeedbackService::new(clock, Arc::clone(&storage.feedback))),
            goals: Arc::new(GoalService::new(clock, Arc::clone(&storage.kv))),
            streaks: Arc::new(StreakService::new(clock, Arc::clone(&storage.kv))),
            preferences: Arc::new(PreferencesService::new(Arc::clone(&storage.kv))),
            auth,
        }
    }

    /// Shared session; clones observe the same signed-in user.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        self.auth.clone()
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn course_store(&self) -> CourseStore {
        self.course_store.clone()
    }

    #[must_use]
    pub fn attendance(&self) -> Arc<AttendanceService> {
        Arc::clone(&self.attendance)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback)
    }

    #[must_use]
    pub fn goals(&self) -> Arc<GoalService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn streaks(&self) -> Arc<StreakService> {
        Arc::clone(&self.streaks)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}

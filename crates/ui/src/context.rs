use std::sync::Arc;

use attendance_core::model::{UserId, UserProfile};
use dioxus::prelude::*;
use services::{
    AttendanceService, AuthService, CourseStore, FeedbackService, GoalService, Notice,
    PreferencesService, StatsService, StreakService,
};

pub trait UiApp: Send + Sync {
    fn auth(&self) -> AuthService;
    fn course_store(&self) -> CourseStore;
    fn attendance(&self) -> Arc<AttendanceService>;
    fn stats(&self) -> Arc<StatsService>;
    fn feedback(&self) -> Arc<FeedbackService>;
    fn goals(&self) -> Arc<GoalService>;
    fn streaks(&self) -> Arc<StreakService>;
    fn preferences(&self) -> Arc<PreferencesService>;

    /// Email to prefill on the login form.
    fn login_email(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    auth: AuthService,
    course_store: CourseStore,
    attendance: Arc<AttendanceService>,
    stats: Arc<StatsService>,
    feedback: Arc<FeedbackService>,
    goals: Arc<GoalService>,
    streaks: Arc<StreakService>,
    preferences: Arc<PreferencesService>,
    login_email: Option<String>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            course_store: app.course_store(),
            attendance: app.attendance(),
            stats: app.stats(),
            feedback: app.feedback(),
            goals: app.goals(),
            streaks: app.streaks(),
            preferences: app.preferences(),
            login_email: app.login_email(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> AuthService {
        self.auth.clone()
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

    #[must_use]
    pub fn login_email(&self) -> Option<String> {
        self.login_email.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Reactive state shared by every view.
#[derive(Clone, Copy)]
pub struct UiState {
    /// Mirrors `AuthService::current_user`; write it after sign-in/out.
    pub session: Signal<Option<UserProfile>>,
    pub toast: Signal<Option<Notice>>,
    pub dark_mode: Signal<bool>,
    pub calculator_open: Signal<bool>,
}

impl UiState {
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.session.peek().as_ref().map(|u| u.id)
    }

    pub fn notify(mut self, notice: Notice) {
        self.toast.set(Some(notice));
    }
}

/// Create the shared UI state below an `AppContext` provider.
pub fn use_ui_state_provider() -> UiState {
    let ctx = use_context::<AppContext>();
    let session = use_signal(|| ctx.auth().current_user());
    let toast = use_signal(|| None);
    let dark_mode = use_signal(|| true);
    let calculator_open = use_signal(|| false);
    use_context_provider(|| UiState {
        session,
        toast,
        dark_mode,
        calculator_open,
    })
}

#[must_use]
pub fn use_ui_state() -> UiState {
    use_context::<UiState>()
}

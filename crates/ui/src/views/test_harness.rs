use std::sync::Arc;

use attendance_core::model::ProfileDraft;
use attendance_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, AttendanceService, AuthService, Clock, CourseStore, FeedbackService,
    GoalService, PreferencesService, StatsService, StreakService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context, use_ui_state_provider};
use crate::views::{
    CalendarView, CoursesView, DashboardView, FeedbackHistoryView, FeedbackView, GoalsView,
    ProfileView, StatisticsView, StreaksView,
};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn auth(&self) -> AuthService {
        self.services.auth()
    }

    fn course_store(&self) -> CourseStore {
        self.services.course_store()
    }

    fn attendance(&self) -> Arc<AttendanceService> {
        self.services.attendance()
    }

    fn stats(&self) -> Arc<StatsService> {
        self.services.stats()
    }

    fn feedback(&self) -> Arc<FeedbackService> {
        self.services.feedback()
    }

    fn goals(&self) -> Arc<GoalService> {
        self.services.goals()
    }

    fn streaks(&self) -> Arc<StreakService> {
        self.services.streaks()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    Courses,
    Calendar,
    Statistics,
    Goals,
    Streaks,
    Feedback,
    FeedbackHistory,
    Profile,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_ui_state_provider();
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Courses => rsx! { CoursesView {} },
        ViewKind::Calendar => rsx! { CalendarView {} },
        ViewKind::Statistics => rsx! { StatisticsView {} },
        ViewKind::Goals => rsx! { GoalsView {} },
        ViewKind::Streaks => rsx! { StreaksView {} },
        ViewKind::Feedback => rsx! { FeedbackView {} },
        ViewKind::FeedbackHistory => rsx! { FeedbackHistoryView {} },
        ViewKind::Profile => rsx! { ProfileView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    /// Render once, then let pending resources resolve.
    pub async fn settle(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn student() -> ProfileDraft {
    ProfileDraft {
        name: "Asha Rao".into(),
        email: "asha@uni.edu".into(),
        roll_number: "CS-042".into(),
        university: Some("State University".into()),
    }
}

/// Harness over in-memory storage with a signed-in student.
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory()).await
}

pub async fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    services
        .auth()
        .sign_up(student(), "secret1", "secret1")
        .await
        .expect("sign up");
    build_harness(view, services)
}

pub fn build_harness(view: ViewKind, services: AppServices) -> ViewHarness {
    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, services }
}

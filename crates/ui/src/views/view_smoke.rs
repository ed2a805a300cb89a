use std::sync::Arc;

use attendance_core::model::{
    Course, CourseDraft, CourseId, FeedbackDraft, GoalDraft, UserId,
};
use storage::repository::{CourseRepository, NewCourseRecord, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

fn course(code: &str, attended: u32, total: u32) -> CourseDraft {
    CourseDraft {
        code: code.into(),
        name: "Data Structures".into(),
        classes_attended: attended,
        total_classes: total,
        target: 75,
    }
}

fn owner(harness: &super::test_harness::ViewHarness) -> UserId {
    harness
        .services
        .auth()
        .current_user()
        .expect("signed in")
        .id
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_overall_and_course() {
    let mut harness = setup_view_harness(ViewKind::Dashboard).await;
    let owner = owner(&harness);
    harness
        .services
        .courses()
        .create_course(owner, course("CS201", 8, 10))
        .await
        .expect("create course");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Overall Attendance"), "missing title in {html}");
    assert!(html.contains("80.0%"), "missing percentage in {html}");
    assert!(html.contains("CS201"), "missing course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn courses_view_smoke_lists_fetched_courses() {
    let mut harness = setup_view_harness(ViewKind::Courses).await;
    let owner = owner(&harness);
    harness
        .services
        .courses()
        .create_course(owner, course("MA101", 3, 4))
        .await
        .expect("create course");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("My Courses"), "missing header in {html}");
    assert!(html.contains("MA101"), "missing course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn calendar_view_smoke_renders_current_month() {
    let mut harness = setup_view_harness(ViewKind::Calendar).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Attendance Calendar"), "missing header in {html}");
    assert!(html.contains("November 2023"), "missing month in {html}");
    assert!(html.contains("No records for this date"), "missing empty day in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn statistics_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Statistics).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No data yet"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn goals_view_smoke_renders_saved_goal() {
    let mut harness = setup_view_harness(ViewKind::Goals).await;
    let owner = owner(&harness);
    harness
        .services
        .goals()
        .add(
            owner,
            GoalDraft {
                title: "Stay above 85".into(),
                ..GoalDraft::default()
            },
        )
        .await
        .expect("add goal");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Stay above 85"), "missing goal in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn streaks_view_smoke_renders_counters() {
    let mut harness = setup_view_harness(ViewKind::Streaks).await;
    harness
        .services
        .streaks()
        .increment()
        .await
        .expect("increment");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Current Streak"), "missing card in {html}");
    assert!(html.contains("1 days"), "missing streak in {html}");
    assert!(html.contains("Achievements"), "missing achievements in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn feedback_views_smoke_render_quota_and_history() {
    let mut harness = setup_view_harness(ViewKind::Feedback).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("10 of 10 submissions left today"),
        "missing quota in {html}"
    );

    let services = harness.services.clone();
    let owner = owner(&harness);
    services
        .feedback()
        .submit(
            owner,
            FeedbackDraft {
                subject: "Calendar tiles".into(),
                description: "Holiday tiles look the same as empty days.".into(),
                ..FeedbackDraft::default()
            },
        )
        .await
        .expect("submit");

    let mut history = super::test_harness::build_harness(ViewKind::FeedbackHistory, services);
    history.settle().await;
    let html = history.render();
    assert!(html.contains("Calendar tiles"), "missing report in {html}");
    assert!(html.contains("Pending"), "missing status in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_renders_student() {
    let mut harness = setup_view_harness(ViewKind::Profile).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Asha Rao"), "missing name in {html}");
    assert!(html.contains("University email"), "missing badge in {html}");
}

struct FailingCourseRepo;

#[async_trait::async_trait]
impl CourseRepository for FailingCourseRepo {
    async fn insert_course(&self, _course: NewCourseRecord) -> Result<CourseId, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn update_course(&self, _course: &Course) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn delete_course(&self, _owner: UserId, _id: CourseId) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_course(&self, _owner: UserId, _id: CourseId) -> Result<Course, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_courses(&self, _owner: UserId) -> Result<Vec<Course>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_error_state() {
    let mut storage = Storage::in_memory();
    storage.courses = Arc::new(FailingCourseRepo);
    let mut harness = setup_view_harness_with_storage(ViewKind::Dashboard, storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
}

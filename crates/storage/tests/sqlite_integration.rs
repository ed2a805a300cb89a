use attendance_core::model::{
    AttendanceStatus, FeedbackDraft, FeedbackStatus, TargetPercentage, UserId,
};
use attendance_core::time::fixed_now;
use chrono::{Duration, NaiveDate};
use storage::repository::{
    AttendanceRepository, BulkMark, CourseRepository, FeedbackRepository, KeyValueStore,
    NewCourseRecord, NewFeedbackRecord, NewUserRecord, StorageError, UserRepository,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

async fn seed_user(repo: &SqliteRepository, email: &str) -> UserId {
    repo.insert_user(NewUserRecord {
        name: "Asha Rao".into(),
        email: email.into(),
        roll_number: "RA2101".into(),
        university: Some("State University".into()),
        password_hash: "not-a-real-hash".into(),
        created_at: fixed_now(),
    })
    .await
    .expect("insert user")
}

fn course(owner: UserId, code: &str, attended: u32, total: u32) -> NewCourseRecord {
    NewCourseRecord {
        owner,
        code: code.into(),
        name: format!("{code} lecture"),
        classes_attended: attended,
        total_classes: total,
        target: TargetPercentage::default(),
        created_at: fixed_now(),
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[tokio::test]
async fn sqlite_users_round_trip_and_reject_duplicates() {
    let repo = connect("memdb_users").await;
    let id = seed_user(&repo, "asha@uni.edu").await;

    let profile = repo.get_user(id).await.unwrap();
    assert_eq!(profile.roll_number, "RA2101");

    let creds = repo
        .find_credentials("asha@uni.edu")
        .await
        .unwrap()
        .expect("credentials");
    assert_eq!(creds.profile.id, id);
    assert_eq!(creds.password_hash, "not-a-real-hash");

    let dup = repo
        .insert_user(NewUserRecord {
            name: "Other".into(),
            email: "asha@uni.edu".into(),
            roll_number: "XX1".into(),
            university: None,
            password_hash: "h".into(),
            created_at: fixed_now(),
        })
        .await;
    assert!(matches!(dup, Err(StorageError::Conflict)));
}

#[tokio::test]
async fn sqlite_courses_list_newest_first() {
    let repo = connect("memdb_courses").await;
    let owner = seed_user(&repo, "c@uni.edu").await;

    let mut older = course(owner, "OLD1", 1, 2);
    older.created_at = fixed_now() - Duration::days(1);
    let old_id = repo.insert_course(older).await.unwrap();
    let new_id = repo.insert_course(course(owner, "NEW1", 0, 0)).await.unwrap();

    let listed = repo.list_courses(owner).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![new_id, old_id]);

    let other = seed_user(&repo, "other@uni.edu").await;
    assert!(matches!(
        repo.get_course(other, old_id).await,
        Err(StorageError::NotFound)
    ));

    repo.delete_course(owner, old_id).await.unwrap();
    assert_eq!(repo.list_courses(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_bulk_mark_is_atomic() {
    let repo = connect("memdb_bulk").await;
    let user = seed_user(&repo, "b@uni.edu").await;
    let a = repo.insert_course(course(user, "A1", 0, 0)).await.unwrap();
    let b = repo.insert_course(course(user, "B1", 3, 4)).await.unwrap();

    let first = BulkMark {
        user_id: user,
        course_ids: vec![b],
        date: date(2),
        status: AttendanceStatus::Absent,
        note: None,
        created_at: fixed_now(),
    };
    repo.mark_bulk(&first).await.unwrap();

    let clash = BulkMark {
        course_ids: vec![a, b],
        status: AttendanceStatus::Present,
        ..first.clone()
    };
    let err = repo.mark_bulk(&clash).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let a_course = repo.get_course(user, a).await.unwrap();
    assert_eq!(a_course.total_classes(), 0);
    let b_course = repo.get_course(user, b).await.unwrap();
    assert_eq!((b_course.classes_attended(), b_course.total_classes()), (3, 5));
    assert_eq!(repo.records_on(user, date(2)).await.unwrap().len(), 1);

    let holiday = BulkMark {
        course_ids: vec![a, b],
        date: date(3),
        status: AttendanceStatus::Holiday,
        note: Some("Founders day".into()),
        ..first
    };
    let created = repo.mark_bulk(&holiday).await.unwrap();
    assert_eq!(created.len(), 2);
    let a_course = repo.get_course(user, a).await.unwrap();
    assert_eq!((a_course.classes_attended(), a_course.total_classes()), (0, 1));

    let records = repo.list_records(user, None).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, date(3));
    assert_eq!(records[0].note.as_deref(), Some("Founders day"));

    let only_a = repo.list_records(user, Some(a)).await.unwrap();
    assert_eq!(only_a.len(), 1);
}

#[tokio::test]
async fn sqlite_record_edits_adjust_course() {
    let repo = connect("memdb_edits").await;
    let user = seed_user(&repo, "e@uni.edu").await;
    let a = repo.insert_course(course(user, "E1", 0, 0)).await.unwrap();
    let created = repo
        .mark_bulk(&BulkMark {
            user_id: user,
            course_ids: vec![a],
            date: date(6),
            status: AttendanceStatus::Absent,
            note: None,
            created_at: fixed_now(),
        })
        .await
        .unwrap();
    let record_id = created[0].id;

    let updated = repo
        .update_record(user, record_id, AttendanceStatus::Present, None)
        .await
        .unwrap();
    assert_eq!(updated.status, AttendanceStatus::Present);
    let course = repo.get_course(user, a).await.unwrap();
    assert_eq!((course.classes_attended(), course.total_classes()), (1, 1));

    repo.delete_record(user, record_id).await.unwrap();
    let course = repo.get_course(user, a).await.unwrap();
    assert_eq!((course.classes_attended(), course.total_classes()), (0, 0));
}

#[tokio::test]
async fn sqlite_feedback_counts_and_status() {
    let repo = connect("memdb_feedback").await;
    let user = seed_user(&repo, "f@uni.edu").await;
    let valid = FeedbackDraft {
        subject: "Calendar".into(),
        description: "Holiday tiles should be easier to tell apart.".into(),
        ..FeedbackDraft::default()
    }
    .validate()
    .unwrap();

    let id = repo
        .insert_feedback(NewFeedbackRecord::from_valid(
            user,
            valid,
            "linux",
            "0.1.0",
            fixed_now(),
        ))
        .await
        .unwrap();

    assert_eq!(
        repo.count_since(user, fixed_now() - Duration::hours(1))
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        repo.count_since(user, fixed_now() + Duration::hours(1))
            .await
            .unwrap(),
        0
    );

    let updated = repo
        .update_status(id, FeedbackStatus::UnderReview, fixed_now())
        .await
        .unwrap();
    assert_eq!(updated.status, FeedbackStatus::UnderReview);
    assert_eq!(repo.list_feedback(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_key_value_upserts() {
    let repo = connect("memdb_kv").await;
    repo.set("app_storage", r#"{"darkMode":true}"#).await.unwrap();
    repo.set("app_storage", r#"{"darkMode":false}"#).await.unwrap();
    assert_eq!(
        repo.get("app_storage").await.unwrap().as_deref(),
        Some(r#"{"darkMode":false}"#)
    );
    repo.remove("app_storage").await.unwrap();
    assert_eq!(repo.get("app_storage").await.unwrap(), None);
}

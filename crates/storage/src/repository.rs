use async_trait::async_trait;
use attendance_core::model::{
    AttendanceRecord, AttendanceStatus, Course, CourseError, CourseId, Feedback, FeedbackCategory,
    FeedbackId, FeedbackKind, FeedbackPriority, FeedbackStatus, RecordId, TargetPercentage,
    UserId, UserProfile, ValidFeedback,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Insert shape for a new account; storage assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub university: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A profile together with its stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub profile: UserProfile,
    pub password_hash: String,
}

/// Insert shape for a new course; storage assigns the id.
#[derive(Debug, Clone)]
pub struct NewCourseRecord {
    pub owner: UserId,
    pub code: String,
    pub name: String,
    pub classes_attended: u32,
    pub total_classes: u32,
    pub target: TargetPercentage,
    pub created_at: DateTime<Utc>,
}

impl NewCourseRecord {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            owner: course.owner(),
            code: course.code().to_owned(),
            name: course.name().to_owned(),
            classes_attended: course.classes_attended(),
            total_classes: course.total_classes(),
            target: course.target(),
            created_at: course.created_at(),
        }
    }

    /// Build the domain course once storage has assigned an id.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the stored fields no longer validate.
    pub fn into_course(self, id: CourseId) -> Result<Course, CourseError> {
        Course::new(
            id,
            self.owner,
            self.code,
            self.name,
            self.classes_attended,
            self.total_classes,
            self.target,
            self.created_at,
        )
    }
}

/// One status applied to several courses on the same date.
#[derive(Debug, Clone)]
pub struct BulkMark {
    pub user_id: UserId,
    pub course_ids: Vec<CourseId>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a submitted report.
#[derive(Debug, Clone)]
pub struct NewFeedbackRecord {
    pub user_id: UserId,
    pub kind: FeedbackKind,
    pub subject: String,
    pub description: String,
    pub categories: Vec<FeedbackCategory>,
    pub priority: FeedbackPriority,
    pub platform: String,
    pub app_version: String,
    pub created_at: DateTime<Utc>,
}

impl NewFeedbackRecord {
    #[must_use]
    pub fn from_valid(
        user_id: UserId,
        feedback: ValidFeedback,
        platform: impl Into<String>,
        app_version: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            kind: feedback.kind,
            subject: feedback.subject,
            description: feedback.description,
            categories: feedback.categories,
            priority: feedback.priority,
            platform: platform.into(),
            app_version: app_version.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn into_feedback(self, id: FeedbackId) -> Feedback {
        Feedback {
            id,
            user_id: self.user_id,
            kind: self.kind,
            subject: self.subject,
            description: self.description,
            categories: self.categories,
            priority: self.priority,
            status: FeedbackStatus::Pending,
            platform: self.platform,
            app_version: self.app_version,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

//
// ─── TRAITS ────────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn get_user(&self, id: UserId) -> Result<UserProfile, StorageError>;

    /// Look up an account by (lowercase) email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn find_credentials(&self, email: &str)
    -> Result<Option<UserCredentials>, StorageError>;

    /// Overwrite the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist, or
    /// `StorageError::Conflict` if the new email belongs to another account.
    async fn update_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError>;

    /// Persist every field of an existing course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no course with that id belongs to
    /// the course's owner.
    async fn update_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Delete a course and its attendance records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not belong to `owner`.
    async fn delete_course(&self, owner: UserId, id: CourseId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not belong to `owner`.
    async fn get_course(&self, owner: UserId, id: CourseId) -> Result<Course, StorageError>;

    /// Courses of `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_courses(&self, owner: UserId) -> Result<Vec<Course>, StorageError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert one record per course and bump each course's counters.
    ///
    /// All or nothing: nothing is written when any course is unknown
    /// (`NotFound`) or already has a record on that date (`Conflict`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` or `StorageError::Conflict` as above.
    async fn mark_bulk(&self, mark: &BulkMark) -> Result<Vec<AttendanceRecord>, StorageError>;

    /// Records of a user, newest date first, optionally for one course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_records(
        &self,
        user: UserId,
        course: Option<CourseId>,
    ) -> Result<Vec<AttendanceRecord>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn records_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StorageError>;

    /// Change a record's status and note, re-counting the course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not belong to `user`.
    async fn update_record(
        &self,
        user: UserId,
        id: RecordId,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<AttendanceRecord, StorageError>;

    /// Remove a record and take it back out of the course counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not belong to `user`.
    async fn delete_record(&self, user: UserId, id: RecordId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the report cannot be stored.
    async fn insert_feedback(&self, feedback: NewFeedbackRecord)
    -> Result<FeedbackId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StorageError>;

    /// Reports of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_feedback(&self, user: UserId) -> Result<Vec<Feedback>, StorageError>;

    /// Number of reports `user` submitted at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn count_since(&self, user: UserId, since: DateTime<Utc>) -> Result<u32, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn update_status(
        &self,
        id: FeedbackId,
        status: FeedbackStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Feedback, StorageError>;
}

/// String values under string keys, for small per-device JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

//
// ─── IN MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, UserCredentials>,
    courses: BTreeMap<CourseId, Course>,
    records: BTreeMap<RecordId, AttendanceRecord>,
    feedback: BTreeMap<FeedbackId, Feedback>,
    next_user: u64,
    next_course: u64,
    next_record: u64,
    next_feedback: u64,
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Every table sits behind one lock, so multi-row writes are all-or-nothing.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn owned_course(
    state: &MemoryState,
    owner: UserId,
    id: CourseId,
) -> Result<&Course, StorageError> {
    state
        .courses
        .get(&id)
        .filter(|course| course.owner() == owner)
        .ok_or(StorageError::NotFound)
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let mut state = self.lock()?;
        if state.users.values().any(|c| c.profile.email == user.email) {
            return Err(StorageError::Conflict);
        }
        let id = UserId::new(next_id(&mut state.next_user));
        state.users.insert(
            id,
            UserCredentials {
                profile: UserProfile {
                    id,
                    name: user.name,
                    email: user.email,
                    roll_number: user.roll_number,
                    university: user.university,
                    created_at: user.created_at,
                },
                password_hash: user.password_hash,
            },
        );
        Ok(id)
    }

    async fn get_user(&self, id: UserId) -> Result<UserProfile, StorageError> {
        let state = self.lock()?;
        state
            .users
            .get(&id)
            .map(|c| c.profile.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|c| c.profile.email == email)
            .cloned())
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        if state
            .users
            .values()
            .any(|c| c.profile.id != profile.id && c.profile.email == profile.email)
        {
            return Err(StorageError::Conflict);
        }
        let entry = state
            .users
            .get_mut(&profile.id)
            .ok_or(StorageError::NotFound)?;
        entry.profile = UserProfile {
            created_at: entry.profile.created_at,
            ..profile.clone()
        };
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let mut state = self.lock()?;
        let id = CourseId::new(next_id(&mut state.next_course));
        let course = course
            .into_course(id)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        state.courses.insert(id, course);
        Ok(id)
    }

    async fn update_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let existing = state
            .courses
            .get_mut(&course.id())
            .filter(|existing| existing.owner() == course.owner())
            .ok_or(StorageError::NotFound)?;
        *existing = course.clone();
        Ok(())
    }

    async fn delete_course(&self, owner: UserId, id: CourseId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        owned_course(&state, owner, id)?;
        state.courses.remove(&id);
        state.records.retain(|_, record| record.course_id != id);
        Ok(())
    }

    async fn get_course(&self, owner: UserId, id: CourseId) -> Result<Course, StorageError> {
        let state = self.lock()?;
        owned_course(&state, owner, id).cloned()
    }

    async fn list_courses(&self, owner: UserId) -> Result<Vec<Course>, StorageError> {
        let state = self.lock()?;
        let mut courses: Vec<Course> = state
            .courses
            .values()
            .filter(|course| course.owner() == owner)
            .cloned()
            .collect();
        courses.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(courses)
    }
}

fn sort_newest_date_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn mark_bulk(&self, mark: &BulkMark) -> Result<Vec<AttendanceRecord>, StorageError> {
        let mut state = self.lock()?;

        // Validate everything against a scratch copy before touching state.
        let mut updated: HashMap<CourseId, Course> = HashMap::new();
        for &course_id in &mark.course_ids {
            let course = owned_course(&state, mark.user_id, course_id)?;
            let already_marked = updated.contains_key(&course_id)
                || state.records.values().any(|r| {
                    r.user_id == mark.user_id && r.course_id == course_id && r.date == mark.date
                });
            if already_marked {
                return Err(StorageError::Conflict);
            }
            let mut course = course.clone();
            course
                .record_class(mark.status)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            updated.insert(course_id, course);
        }

        let mut created = Vec::with_capacity(mark.course_ids.len());
        for &course_id in &mark.course_ids {
            let id = RecordId::new(next_id(&mut state.next_record));
            let record = AttendanceRecord {
                id,
                user_id: mark.user_id,
                course_id,
                date: mark.date,
                status: mark.status,
                note: mark.note.clone(),
                created_at: mark.created_at,
            };
            state.records.insert(id, record.clone());
            created.push(record);
        }
        state.courses.extend(updated);
        Ok(created)
    }

    async fn list_records(
        &self,
        user: UserId,
        course: Option<CourseId>,
    ) -> Result<Vec<AttendanceRecord>, StorageError> {
        let state = self.lock()?;
        let mut records: Vec<AttendanceRecord> = state
            .records
            .values()
            .filter(|r| r.user_id == user && course.is_none_or(|c| r.course_id == c))
            .cloned()
            .collect();
        sort_newest_date_first(&mut records);
        Ok(records)
    }

    async fn records_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .records
            .values()
            .filter(|r| r.user_id == user && r.date == date)
            .cloned()
            .collect())
    }

    async fn update_record(
        &self,
        user: UserId,
        id: RecordId,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<AttendanceRecord, StorageError> {
        let mut state = self.lock()?;
        let previous = state
            .records
            .get(&id)
            .filter(|r| r.user_id == user)
            .cloned()
            .ok_or(StorageError::NotFound)?;

        if let Some(course) = state.courses.get_mut(&previous.course_id) {
            course.change_recorded_status(previous.status, status);
        }
        let record = AttendanceRecord {
            status,
            note,
            ..previous
        };
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_record(&self, user: UserId, id: RecordId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let record = state
            .records
            .get(&id)
            .filter(|r| r.user_id == user)
            .cloned()
            .ok_or(StorageError::NotFound)?;
        if let Some(course) = state.courses.get_mut(&record.course_id) {
            course.unrecord_class(record.status);
        }
        state.records.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepository {
    async fn insert_feedback(
        &self,
        feedback: NewFeedbackRecord,
    ) -> Result<FeedbackId, StorageError> {
        let mut state = self.lock()?;
        let id = FeedbackId::new(next_id(&mut state.next_feedback));
        state.feedback.insert(id, feedback.into_feedback(id));
        Ok(id)
    }

    async fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StorageError> {
        let state = self.lock()?;
        state.feedback.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_feedback(&self, user: UserId) -> Result<Vec<Feedback>, StorageError> {
        let state = self.lock()?;
        let mut items: Vec<Feedback> = state
            .feedback
            .values()
            .filter(|f| f.user_id == user)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn count_since(&self, user: UserId, since: DateTime<Utc>) -> Result<u32, StorageError> {
        let state = self.lock()?;
        let count = state
            .feedback
            .values()
            .filter(|f| f.user_id == user && f.created_at >= since)
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }

    async fn update_status(
        &self,
        id: FeedbackId,
        status: FeedbackStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Feedback, StorageError> {
        let mut state = self.lock()?;
        let feedback = state.feedback.get_mut(&id).ok_or(StorageError::NotFound)?;
        feedback.status = status;
        feedback.updated_at = updated_at;
        Ok(feedback.clone())
    }
}

/// In-memory key-value store.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let attendance: Arc<dyn AttendanceRepository> = Arc::new(repo.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(repo);
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        Self {
            users,
            courses,
            attendance,
            feedback,
            kv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::time::fixed_now;

    fn new_course(owner: UserId, code: &str, attended: u32, total: u32) -> NewCourseRecord {
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

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn mark(user: UserId, courses: &[CourseId], date: NaiveDate, status: AttendanceStatus) -> BulkMark {
        BulkMark {
            user_id: user,
            course_ids: courses.to_vec(),
            date,
            status,
            note: None,
            created_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn bulk_mark_updates_counters() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(1);
        let a = repo.insert_course(new_course(user, "A", 0, 0)).await.unwrap();
        let b = repo.insert_course(new_course(user, "B", 2, 4)).await.unwrap();

        let created = repo
            .mark_bulk(&mark(user, &[a, b], day(1), AttendanceStatus::Present))
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        let b_course = repo.get_course(user, b).await.unwrap();
        assert_eq!((b_course.classes_attended(), b_course.total_classes()), (3, 5));

        repo.mark_bulk(&mark(user, &[a], day(2), AttendanceStatus::Holiday))
            .await
            .unwrap();
        let a_course = repo.get_course(user, a).await.unwrap();
        assert_eq!((a_course.classes_attended(), a_course.total_classes()), (1, 2));
    }

    #[tokio::test]
    async fn bulk_mark_is_all_or_nothing() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(1);
        let a = repo.insert_course(new_course(user, "A", 0, 0)).await.unwrap();
        let b = repo.insert_course(new_course(user, "B", 0, 0)).await.unwrap();
        repo.mark_bulk(&mark(user, &[b], day(1), AttendanceStatus::Absent))
            .await
            .unwrap();

        let err = repo
            .mark_bulk(&mark(user, &[a, b], day(1), AttendanceStatus::Present))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));

        let a_course = repo.get_course(user, a).await.unwrap();
        assert_eq!(a_course.total_classes(), 0);
        assert_eq!(repo.list_records(user, None).await.unwrap().len(), 1);

        let stranger = UserId::new(2);
        let err = repo
            .mark_bulk(&mark(stranger, &[a], day(2), AttendanceStatus::Present))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn record_edits_keep_counters_consistent() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(1);
        let a = repo.insert_course(new_course(user, "A", 0, 0)).await.unwrap();
        let created = repo
            .mark_bulk(&mark(user, &[a], day(3), AttendanceStatus::Present))
            .await
            .unwrap();
        let record_id = created[0].id;

        repo.update_record(user, record_id, AttendanceStatus::Absent, Some("sick".into()))
            .await
            .unwrap();
        let course = repo.get_course(user, a).await.unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (0, 1));

        repo.delete_record(user, record_id).await.unwrap();
        let course = repo.get_course(user, a).await.unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (0, 0));
        assert!(matches!(
            repo.delete_record(user, record_id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryRepository::new();
        let user = NewUserRecord {
            name: "Asha".into(),
            email: "asha@uni.edu".into(),
            roll_number: "R100".into(),
            university: None,
            password_hash: "hash".into(),
            created_at: fixed_now(),
        };
        repo.insert_user(user.clone()).await.unwrap();
        assert!(matches!(
            repo.insert_user(user).await,
            Err(StorageError::Conflict)
        ));
        assert!(repo.find_credentials("asha@uni.edu").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn key_value_round_trip() {
        let kv = InMemoryKeyValueStore::new();
        assert_eq!(kv.get("k").await.unwrap(), None);
        kv.set("k", "{}").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("{}"));
        kv.remove("k").await.unwrap();
        kv.remove("k").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), None);
    }
}

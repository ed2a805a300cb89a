use std::sync::Arc;

use attendance_core::model::{AttendanceStatus, Course, CourseDraft, CourseId, UserId};
use storage::repository::{CourseRepository, NewCourseRecord};

use crate::Clock;
use crate::error::CourseServiceError;

/// Course CRUD plus the quick attended/missed counters.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(clock: Clock, courses: Arc<dyn CourseRepository>) -> Self {
        Self { clock, courses }
    }

    /// Validate and persist a new course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` for validation failures.
    /// Returns `CourseServiceError::Storage` if persistence fails.
    pub async fn create_course(
        &self,
        owner: UserId,
        draft: CourseDraft,
    ) -> Result<Course, CourseServiceError> {
        let now = self.clock.now();
        let course = draft
            .into_course(CourseId::new(1), owner, now)
            .inspect_err(|err| tracing::warn!(%err, "rejected course"))?;
        let id = self
            .courses
            .insert_course(NewCourseRecord::from_course(&course))
            .await?;
        tracing::info!(course_id = %id, owner = %owner, "course created");
        Ok(course.with_id(id))
    }

    /// Replace the editable fields of a course, keeping its creation time.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` if the draft fails validation.
    /// Returns `CourseServiceError::Storage` if the course is missing or
    /// persistence fails.
    pub async fn update_course(
        &self,
        owner: UserId,
        id: CourseId,
        draft: CourseDraft,
    ) -> Result<Course, CourseServiceError> {
        let existing = self.courses.get_course(owner, id).await?;
        let updated = draft
            .into_course(id, owner, existing.created_at())
            .inspect_err(|err| tracing::warn!(%err, course_id = %id, "rejected course update"))?;
        self.courses.update_course(&updated).await?;
        tracing::info!(course_id = %id, "course updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the course is missing or
    /// deletion fails.
    pub async fn delete_course(&self, owner: UserId, id: CourseId) -> Result<(), CourseServiceError> {
        self.courses.delete_course(owner, id).await?;
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the course is missing.
    pub async fn get_course(&self, owner: UserId, id: CourseId) -> Result<Course, CourseServiceError> {
        Ok(self.courses.get_course(owner, id).await?)
    }

    /// Courses of `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn list_courses(&self, owner: UserId) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses(owner).await?)
    }

    /// Count one more held class without writing a dated record.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` on counter overflow.
    /// Returns `CourseServiceError::Storage` if the course is missing or
    /// persistence fails.
    pub async fn increment_attendance(
        &self,
        owner: UserId,
        id: CourseId,
        attended: bool,
    ) -> Result<Course, CourseServiceError> {
        let mut course = self.courses.get_course(owner, id).await?;
        let status = if attended {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        };
        course.record_class(status)?;
        self.courses.update_course(&course).await?;
        tracing::debug!(course_id = %id, attended, "attendance counter bumped");
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use attendance_core::model::CourseError;
    use attendance_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service() -> CourseService {
        CourseService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    fn draft(code: &str, attended: u32, total: u32) -> CourseDraft {
        CourseDraft {
            code: code.into(),
            name: "Data Structures".into(),
            classes_attended: attended,
            total_classes: total,
            target: 75,
        }
    }

    #[tokio::test]
    async fn create_and_list_courses() {
        let service = service();
        let owner = UserId::new(1);
        let created = service.create_course(owner, draft("CS201", 8, 10)).await.unwrap();
        assert_eq!(created.code(), "CS201");

        let listed = service.list_courses(owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), created.id());
        assert!(service.list_courses(UserId::new(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_attended_above_total() {
        let err = service()
            .create_course(UserId::new(1), draft("CS201", 11, 10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Course(CourseError::AttendedExceedsTotal)
        ));
    }

    #[tokio::test]
    async fn update_revalidates_and_keeps_created_at() {
        let service = service();
        let owner = UserId::new(1);
        let created = service.create_course(owner, draft("CS201", 5, 10)).await.unwrap();

        let err = service
            .update_course(owner, created.id(), draft("CS201", 12, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseServiceError::Course(_)));

        let updated = service
            .update_course(owner, created.id(), draft("CS202", 6, 10))
            .await
            .unwrap();
        assert_eq!(updated.code(), "CS202");
        assert_eq!(updated.created_at(), created.created_at());
    }

    #[tokio::test]
    async fn increment_attendance_counts_both_ways() {
        let service = service();
        let owner = UserId::new(1);
        let created = service.create_course(owner, draft("MA101", 3, 4)).await.unwrap();

        let course = service
            .increment_attendance(owner, created.id(), true)
            .await
            .unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (4, 5));

        let course = service
            .increment_attendance(owner, created.id(), false)
            .await
            .unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (4, 6));
    }

    #[tokio::test]
    async fn delete_removes_course() {
        let service = service();
        let owner = UserId::new(1);
        let created = service.create_course(owner, draft("PH100", 0, 0)).await.unwrap();
        service.delete_course(owner, created.id()).await.unwrap();
        assert!(service.get_course(owner, created.id()).await.is_err());
    }
}

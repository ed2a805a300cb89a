use std::collections::BTreeMap;
use std::sync::Arc;

use attendance_core::model::{
    AttendanceRecord, AttendanceStatus, CourseId, RecordId, UserId, normalize_note,
};
use attendance_core::stats::{DayTally, MonthlyAttendance, monthly_breakdown, tally_by_date};
use chrono::NaiveDate;
use storage::repository::{AttendanceRepository, BulkMark, CourseRepository};

use crate::Clock;
use crate::error::AttendanceServiceError;

/// Form input for marking one date across several courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkMarkRequest {
    pub course_ids: Vec<CourseId>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Dated attendance records and the views derived from them.
#[derive(Clone)]
pub struct AttendanceService {
    clock: Clock,
    attendance: Arc<dyn AttendanceRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl AttendanceService {
    #[must_use]
    pub fn new(
        clock: Clock,
        attendance: Arc<dyn AttendanceRepository>,
        courses: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            clock,
            attendance,
            courses,
        }
    }

    /// Default date for the marking form.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Mark every selected course with the same status on one date.
    ///
    /// Either every course gets a record or none does.
    ///
    /// # Errors
    ///
    /// Returns `AttendanceServiceError::EmptySelection` when no course is
    /// selected, `AttendanceServiceError::AlreadyMarked` naming the courses
    /// that already have a record on that date, or
    /// `AttendanceServiceError::Storage` for unknown courses and backend
    /// failures.
    pub async fn bulk_mark(
        &self,
        owner: UserId,
        request: BulkMarkRequest,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let mut course_ids = Vec::with_capacity(request.course_ids.len());
        for id in request.course_ids {
            if !course_ids.contains(&id) {
                course_ids.push(id);
            }
        }
        if course_ids.is_empty() {
            return Err(AttendanceServiceError::EmptySelection);
        }
        let note = normalize_note(request.note)?;

        let existing = self.attendance.records_on(owner, request.date).await?;
        let clashing: Vec<CourseId> = course_ids
            .iter()
            .copied()
            .filter(|id| existing.iter().any(|r| r.course_id == *id))
            .collect();
        if !clashing.is_empty() {
            let mut codes = Vec::with_capacity(clashing.len());
            for id in clashing {
                let course = self.courses.get_course(owner, id).await?;
                codes.push(course.code().to_owned());
            }
            tracing::warn!(date = %request.date, courses = ?codes, "attendance already marked");
            return Err(AttendanceServiceError::AlreadyMarked(codes));
        }

        let mark = BulkMark {
            user_id: owner,
            course_ids,
            date: request.date,
            status: request.status,
            note,
            created_at: self.clock.now(),
        };
        let created = self
            .attendance
            .mark_bulk(&mark)
            .await
            .inspect_err(|err| tracing::error!(%err, "bulk attendance failed"))?;
        tracing::info!(
            count = created.len(),
            date = %mark.date,
            status = mark.status.as_str(),
            "attendance marked"
        );
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if repository access fails.
    pub async fn list_records(
        &self,
        owner: UserId,
        course: Option<CourseId>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        Ok(self.attendance.list_records(owner, course).await?)
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if repository access fails.
    pub async fn records_on(
        &self,
        owner: UserId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        Ok(self.attendance.records_on(owner, date).await?)
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if repository access fails.
    pub async fn day_tally(
        &self,
        owner: UserId,
        date: NaiveDate,
    ) -> Result<DayTally, AttendanceServiceError> {
        let records = self.attendance.records_on(owner, date).await?;
        Ok(DayTally::from_records(&records))
    }

    /// Per-day tallies for the calendar.
    ///
    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if repository access fails.
    pub async fn calendar(
        &self,
        owner: UserId,
    ) -> Result<BTreeMap<NaiveDate, DayTally>, AttendanceServiceError> {
        let records = self.attendance.list_records(owner, None).await?;
        Ok(tally_by_date(&records))
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Attendance` for an oversized note, or
    /// `AttendanceServiceError::Storage` if the record is missing.
    pub async fn update_record(
        &self,
        owner: UserId,
        id: RecordId,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let note = normalize_note(note)?;
        let record = self
            .attendance
            .update_record(owner, id, status, note)
            .await?;
        tracing::info!(record_id = %id, status = status.as_str(), "attendance record updated");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if the record is missing.
    pub async fn delete_record(
        &self,
        owner: UserId,
        id: RecordId,
    ) -> Result<(), AttendanceServiceError> {
        self.attendance.delete_record(owner, id).await?;
        tracing::info!(record_id = %id, "attendance record deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AttendanceServiceError::Storage` if repository access fails.
    pub async fn monthly_breakdown(
        &self,
        owner: UserId,
    ) -> Result<Vec<MonthlyAttendance>, AttendanceServiceError> {
        let records = self.attendance.list_records(owner, None).await?;
        Ok(monthly_breakdown(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use attendance_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, NewCourseRecord, StorageError};
    use attendance_core::model::TargetPercentage;

    async fn setup() -> (AttendanceService, InMemoryRepository, UserId, CourseId, CourseId) {
        let repo = InMemoryRepository::new();
        let owner = UserId::new(1);
        let mut ids = Vec::new();
        for code in ["CS101", "MA101"] {
            let id = repo
                .insert_course(NewCourseRecord {
                    owner,
                    code: code.into(),
                    name: code.into(),
                    classes_attended: 0,
                    total_classes: 0,
                    target: TargetPercentage::default(),
                    created_at: fixed_now(),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        let service = AttendanceService::new(
            Clock::Fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        );
        (service, repo, owner, ids[0], ids[1])
    }

    fn request(ids: &[CourseId], status: AttendanceStatus) -> BulkMarkRequest {
        BulkMarkRequest {
            course_ids: ids.to_vec(),
            date: fixed_now().date_naive(),
            status,
            note: Some("  ".into()),
        }
    }

    #[tokio::test]
    async fn rejects_empty_selection() {
        let (service, _, owner, _, _) = setup().await;
        let err = service
            .bulk_mark(owner, request(&[], AttendanceStatus::Present))
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceServiceError::EmptySelection));
    }

    #[tokio::test]
    async fn reports_already_marked_courses_and_writes_nothing() {
        let (service, repo, owner, cs, ma) = setup().await;
        service
            .bulk_mark(owner, request(&[cs], AttendanceStatus::Present))
            .await
            .unwrap();

        let err = service
            .bulk_mark(owner, request(&[ma, cs], AttendanceStatus::Absent))
            .await
            .unwrap_err();
        match err {
            AttendanceServiceError::AlreadyMarked(codes) => assert_eq!(codes, vec!["CS101"]),
            other => panic!("unexpected error: {other:?}"),
        }
        let ma_course = repo.get_course(owner, ma).await.unwrap();
        assert_eq!(ma_course.total_classes(), 0);
    }

    #[tokio::test]
    async fn duplicate_ids_are_marked_once() {
        let (service, repo, owner, cs, _) = setup().await;
        let created = service
            .bulk_mark(owner, request(&[cs, cs], AttendanceStatus::Present))
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].note, None);
        let course = repo.get_course(owner, cs).await.unwrap();
        assert_eq!((course.classes_attended(), course.total_classes()), (1, 1));
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let (service, _, owner, _, _) = setup().await;
        let err = service
            .bulk_mark(owner, request(&[CourseId::new(99)], AttendanceStatus::Present))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AttendanceServiceError::Storage(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn tally_and_monthly_views() {
        let (service, _, owner, cs, ma) = setup().await;
        service
            .bulk_mark(owner, request(&[cs, ma], AttendanceStatus::Holiday))
            .await
            .unwrap();

        let tally = service.day_tally(owner, service.today()).await.unwrap();
        assert_eq!(tally.holiday, 2);

        let calendar = service.calendar(owner).await.unwrap();
        assert_eq!(calendar.len(), 1);

        let months = service.monthly_breakdown(owner).await.unwrap();
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].percentage, 0.0);
    }

    #[tokio::test]
    async fn update_and_delete_record() {
        let (service, repo, owner, cs, _) = setup().await;
        let created = service
            .bulk_mark(owner, request(&[cs], AttendanceStatus::Absent))
            .await
            .unwrap();
        let record = service
            .update_record(owner, created[0].id, AttendanceStatus::Present, Some(" late ".into()))
            .await
            .unwrap();
        assert_eq!(record.note.as_deref(), Some("late"));
        assert_eq!(repo.get_course(owner, cs).await.unwrap().classes_attended(), 1);

        service.delete_record(owner, created[0].id).await.unwrap();
        assert!(service.list_records(owner, Some(cs)).await.unwrap().is_empty());
    }
}

// Attendance writer and reads
//
// submit() is the whole check-in pipeline: validate, resolve the event,
// reject duplicates, persist, then hand the notice to the broker. Fan-out
// success is independent of the caller's response.

use std::sync::Arc;

use tamu_core::{
    AttendanceNotice, AttendanceRecord, AttendanceSubmission, Event, ListResponse, Pagination,
};
use tamu_storage::{AttendanceFilter, CreateAttendance, Database, ExportRow};

use crate::error::{ApiError, ApiResult};
use crate::live::EventRoomBroker;

pub struct AttendanceService {
    db: Arc<Database>,
    broker: EventRoomBroker,
}

impl AttendanceService {
    pub fn new(db: Arc<Database>, broker: EventRoomBroker) -> Self {
        Self { db, broker }
    }

    /// Record a check-in against the event named by slug.
    ///
    /// Exactly one broadcast attempt per successful write; a room with no
    /// displays makes the attempt a no-op, never an error.
    pub async fn submit(&self, submission: AttendanceSubmission) -> ApiResult<AttendanceRecord> {
        let submission = submission.trimmed();
        submission.validate()?;

        let event = self
            .db
            .get_event_by_slug(&submission.event_slug)
            .await?
            .ok_or(ApiError::NotFound("event"))?;

        if self
            .db
            .attendance_exists(event.id, &submission.guest_name, &submission.institution)
            .await?
        {
            return Err(ApiError::Conflict(
                "this guest has already checked in to this event".to_string(),
            ));
        }

        // Capture a snapshot reference when the free-text institution matches
        // a managed one; used for delete protection.
        let institution_id = self
            .db
            .find_institution_by_name(&submission.institution)
            .await?
            .map(|i| i.id);

        let row = self
            .db
            .create_attendance(CreateAttendance {
                event_id: event.id,
                guest_name: submission.guest_name,
                institution: submission.institution,
                institution_id,
                position: submission.position,
                phone: submission.phone,
                email: submission.email,
                representative_count: submission.representative_count.unwrap_or(1),
                category: submission.category.unwrap_or_default().to_string(),
            })
            .await?;

        let record = AttendanceRecord::from(row);

        tracing::info!(
            attendance_id = record.id,
            event_id = event.id,
            event_slug = %event.slug,
            "check-in recorded"
        );
        self.broker
            .broadcast(event.id, &AttendanceNotice::from(&record))
            .await;

        Ok(record)
    }

    pub async fn get(&self, id: i64) -> ApiResult<AttendanceRecord> {
        let row = self
            .db
            .get_attendance(id)
            .await?
            .ok_or(ApiError::NotFound("attendance record"))?;
        Ok(row.into())
    }

    /// Paginated backlog for one event, newest first.
    pub async fn list_for_event(
        &self,
        event_id: i64,
        filter: AttendanceFilter,
        page: i64,
        page_size: i64,
    ) -> ApiResult<(Event, ListResponse<AttendanceRecord>)> {
        let event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or(ApiError::NotFound("event"))?;

        let offset = (page - 1) * page_size;
        let rows = self
            .db
            .list_event_attendance(event_id, &filter, page_size, offset)
            .await?;
        let total = self.db.count_event_attendance(event_id, &filter).await?;

        let records = rows.into_iter().map(Into::into).collect();
        Ok((
            event.into(),
            ListResponse::paginated(records, Pagination::new(page, page_size, total)),
        ))
    }

    /// Rows for CSV export, arrival order.
    pub async fn export_for_event(
        &self,
        event_id: i64,
        filter: AttendanceFilter,
    ) -> ApiResult<(Event, Vec<ExportRow>)> {
        let event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or(ApiError::NotFound("event"))?;
        let rows = self.db.export_event_attendance(event_id, &filter).await?;
        Ok((event.into(), rows))
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.db.delete_attendance(id).await? {
            return Err(ApiError::NotFound("attendance record"));
        }
        Ok(())
    }
}

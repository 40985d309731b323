// Event service for business logic

use std::sync::Arc;

use tamu_core::{
    CategoryRollup, CreateEventRequest, Event, EventStats, GuestCategory, InstitutionRollup,
    ListResponse, Pagination, UpdateEventRequest,
};
use tamu_storage::{CreateEvent, Database, UpdateEvent};

use crate::error::{ApiError, ApiResult};

pub struct EventService {
    db: Arc<Database>,
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateEventRequest) -> ApiResult<Event> {
        req.validate()?;
        let slug = req.slug.trim().to_string();
        if self.db.get_event_by_slug(&slug).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "an event with slug '{slug}' already exists"
            )));
        }
        let row = self
            .db
            .create_event(CreateEvent {
                name: req.name.trim().to_string(),
                slug,
                description: req.description,
                date: req.date,
                location: req.location,
            })
            .await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Event> {
        let row = self
            .db
            .get_event(id)
            .await?
            .ok_or(ApiError::NotFound("event"))?;
        Ok(row.into())
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<Event> {
        let row = self
            .db
            .get_event_by_slug(slug)
            .await?
            .ok_or(ApiError::NotFound("event"))?;
        Ok(row.into())
    }

    pub async fn list(&self, page: i64, page_size: i64) -> ApiResult<ListResponse<Event>> {
        let offset = (page - 1) * page_size;
        let rows = self.db.list_events(page_size, offset).await?;
        let total = self.db.count_events().await?;
        let events = rows.into_iter().map(Into::into).collect();
        Ok(ListResponse::paginated(
            events,
            Pagination::new(page, page_size, total),
        ))
    }

    pub async fn list_upcoming(&self, limit: i64) -> ApiResult<Vec<Event>> {
        let rows = self.db.list_upcoming_events(limit).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_past(&self, limit: i64) -> ApiResult<Vec<Event>> {
        let rows = self.db.list_past_events(limit).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: i64, req: UpdateEventRequest) -> ApiResult<Event> {
        req.validate()?;
        let existing = self
            .db
            .get_event(id)
            .await?
            .ok_or(ApiError::NotFound("event"))?;

        // Slug changes must not collide with another event
        if let Some(slug) = &req.slug {
            let slug = slug.trim();
            if slug != existing.slug && self.db.get_event_by_slug(slug).await?.is_some() {
                return Err(ApiError::Conflict(format!(
                    "an event with slug '{slug}' already exists"
                )));
            }
        }

        let row = self
            .db
            .update_event(
                id,
                UpdateEvent {
                    name: req.name,
                    slug: req.slug.map(|s| s.trim().to_string()),
                    description: req.description,
                    date: req.date,
                    location: req.location,
                },
            )
            .await?
            .ok_or(ApiError::NotFound("event"))?;
        Ok(row.into())
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.db.delete_event(id).await? {
            return Err(ApiError::NotFound("event"));
        }
        tracing::info!(event_id = id, "event deleted (attendance cascaded)");
        Ok(())
    }

    pub async fn stats(
        &self,
        id: i64,
    ) -> ApiResult<(Event, EventStats, Vec<InstitutionRollup>, Vec<CategoryRollup>)> {
        let event = self.get(id).await?;
        let stats = self.db.event_stats(id).await?;
        let by_institution = self.db.attendance_by_institution(id).await?;
        let by_category = self.db.attendance_by_category(id).await?;

        Ok((
            event,
            EventStats {
                total_attendees: stats.total_attendees,
                total_institutions: stats.total_institutions,
                total_represented: stats.total_represented,
                first_arrival: stats.first_arrival,
                last_arrival: stats.last_arrival,
            },
            by_institution
                .into_iter()
                .map(|r| InstitutionRollup {
                    institution: r.institution,
                    attendee_count: r.attendee_count,
                    total_represented: r.total_represented,
                })
                .collect(),
            by_category
                .into_iter()
                .map(|r| CategoryRollup {
                    category: GuestCategory::from(r.category.as_str()),
                    attendee_count: r.attendee_count,
                    total_represented: r.total_represented,
                })
                .collect(),
        ))
    }
}

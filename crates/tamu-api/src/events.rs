// Event CRUD HTTP routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use tamu_core::{
    CategoryRollup, CreateEventRequest, Event, EventStats, InstitutionRollup, ListResponse,
    UpdateEventRequest,
};
use tamu_storage::Database;

use crate::auth::AuthOperator;
use crate::error::ApiResult;
use crate::services::EventService;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(EventService::new(db)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/upcoming", get(list_upcoming))
        .route("/v1/events/past", get(list_past))
        .route("/v1/events/slug/{slug}", get(get_event_by_slug))
        .route(
            "/v1/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/v1/events/{event_id}/stats", get(event_stats))
        .with_state(state)
}

/// Query parameters for the paginated event list
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventsQuery {
    #[param(example = 1)]
    pub page: Option<i64>,
    #[param(example = 20)]
    pub page_size: Option<i64>,
}

/// Query parameters for upcoming/past listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitQuery {
    #[param(example = 10)]
    pub limit: Option<i64>,
}

/// Stats payload: event metadata plus attendance rollups
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventStatsResponse {
    pub event: Event,
    pub stats: EventStats,
    pub by_institution: Vec<InstitutionRollup>,
    pub by_category: Vec<CategoryRollup>,
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let event = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events - List events, newest date first
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Paginated events", body = ListResponse<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Json<ListResponse<Event>>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    Ok(Json(state.service.list(page, page_size).await?))
}

/// GET /v1/events/upcoming - Events with a future date, soonest first
#[utoipa::path(
    get,
    path = "/v1/events/upcoming",
    params(LimitQuery),
    responses(
        (status = 200, description = "Upcoming events", body = ListResponse<Event>)
    ),
    tag = "events"
)]
pub async fn list_upcoming(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<ListResponse<Event>>> {
    let limit = query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);
    let events = state.service.list_upcoming(limit).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/past - Events with a past date, most recent first
#[utoipa::path(
    get,
    path = "/v1/events/past",
    params(LimitQuery),
    responses(
        (status = 200, description = "Past events", body = ListResponse<Event>)
    ),
    tag = "events"
)]
pub async fn list_past(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<ListResponse<Event>>> {
    let limit = query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);
    let events = state.service.list_past(limit).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.service.get(event_id).await?))
}

/// GET /v1/events/slug/{slug} - Get event by slug (attendance form, display)
#[utoipa::path(
    get,
    path = "/v1/events/slug/{slug}",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.service.get_by_slug(&slug).await?))
}

/// GET /v1/events/{event_id}/stats - Attendance rollups for one event
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/stats",
    params(("event_id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event statistics", body = EventStatsResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn event_stats(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<EventStatsResponse>> {
    let (event, stats, by_institution, by_category) = state.service.stats(event_id).await?;
    Ok(Json(EventStatsResponse {
        event,
        stats,
        by_institution,
        by_category,
    }))
}

/// PUT /v1/events/{event_id} - Update an event
#[utoipa::path(
    put,
    path = "/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.service.update(event_id, req).await?))
}

/// DELETE /v1/events/{event_id} - Delete an event and its attendance
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(("event_id" = i64, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Path(event_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

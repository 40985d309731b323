// Attendance HTTP routes: public submission, backlog reads, export, delete

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use tamu_core::{AttendanceRecord, AttendanceSubmission, Event, ListResponse};
use tamu_storage::{AttendanceFilter, Database};

use crate::auth::AuthOperator;
use crate::error::ApiResult;
use crate::export::render_csv;
use crate::live::EventRoomBroker;
use crate::services::AttendanceService;

const DEFAULT_PAGE_SIZE: i64 = 20;
/// Displays fetch their whole backlog in one page.
const MAX_PAGE_SIZE: i64 = 1000;

/// App state for attendance routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AttendanceService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, broker: EventRoomBroker) -> Self {
        Self {
            service: Arc::new(AttendanceService::new(db, broker)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/attendance", post(submit_attendance))
        .route("/v1/attendance/event/{event_id}", get(list_event_attendance))
        .route(
            "/v1/attendance/event/{event_id}/export",
            get(export_event_attendance),
        )
        .route("/v1/attendance/{id}", delete(delete_attendance))
        .with_state(state)
}

/// Query parameters for attendance listing and export
#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    #[param(example = 1)]
    pub page: Option<i64>,
    #[param(example = 20)]
    pub page_size: Option<i64>,
    /// Exact institution filter
    pub institution: Option<String>,
    /// Substring match on guest name or institution
    pub search: Option<String>,
}

impl AttendanceQuery {
    fn filter(&self) -> AttendanceFilter {
        AttendanceFilter {
            institution: self.institution.clone(),
            search: self.search.clone(),
        }
    }
}

/// Listing payload: event metadata plus its attendance page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventAttendanceResponse {
    pub event: Event,
    #[serde(flatten)]
    pub attendance: ListResponse<AttendanceRecord>,
}

/// POST /v1/attendance - Record a check-in (public, no auth)
#[utoipa::path(
    post,
    path = "/v1/attendance",
    request_body = AttendanceSubmission,
    responses(
        (status = 201, description = "Check-in recorded", body = AttendanceRecord),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Guest already checked in")
    ),
    tag = "attendance"
)]
pub async fn submit_attendance(
    State(state): State<AppState>,
    Json(submission): Json<AttendanceSubmission>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let record = state.service.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/attendance/event/{event_id} - Backlog for one event, newest first
#[utoipa::path(
    get,
    path = "/v1/attendance/event/{event_id}",
    params(
        ("event_id" = i64, Path, description = "Event ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Attendance page", body = EventAttendanceResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "attendance"
)]
pub async fn list_event_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> ApiResult<Json<EventAttendanceResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let (event, attendance) = state
        .service
        .list_for_event(event_id, query.filter(), page, page_size)
        .await?;
    Ok(Json(EventAttendanceResponse { event, attendance }))
}

/// GET /v1/attendance/event/{event_id}/export - CSV download
#[utoipa::path(
    get,
    path = "/v1/attendance/event/{event_id}/export",
    params(
        ("event_id" = i64, Path, description = "Event ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 404, description = "Event not found")
    ),
    tag = "attendance"
)]
pub async fn export_event_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> ApiResult<impl IntoResponse> {
    let (event, rows) = state
        .service
        .export_for_event(event_id, query.filter())
        .await?;

    let csv = render_csv(&rows);
    let filename = format!(
        "attendance-{}-{}.csv",
        event.slug,
        Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

/// DELETE /v1/attendance/{id} - Remove one record (operator only)
#[utoipa::path(
    delete,
    path = "/v1/attendance/{id}",
    params(("id" = i64, Path, description = "Attendance record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    ),
    tag = "attendance"
)]
pub async fn delete_attendance(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Institution CRUD HTTP routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    routing::post,
    Json, Router,
};

use tamu_core::{Institution, ListResponse, SaveInstitutionRequest};
use tamu_storage::Database;

use crate::auth::AuthOperator;
use crate::error::ApiResult;
use crate::services::InstitutionService;

/// App state for institution routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InstitutionService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(InstitutionService::new(db)),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/institutions", post(create_institution).get(list_institutions))
        .route(
            "/v1/institutions/{id}",
            get(get_institution)
                .put(update_institution)
                .delete(delete_institution),
        )
        .with_state(state)
}

/// GET /v1/institutions - All institutions, grouped by kind
#[utoipa::path(
    get,
    path = "/v1/institutions",
    responses(
        (status = 200, description = "Institutions", body = ListResponse<Institution>)
    ),
    tag = "institutions"
)]
pub async fn list_institutions(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<Institution>>> {
    Ok(Json(ListResponse::new(state.service.list().await?)))
}

/// GET /v1/institutions/{id} - Get institution by ID
#[utoipa::path(
    get,
    path = "/v1/institutions/{id}",
    params(("id" = i64, Path, description = "Institution ID")),
    responses(
        (status = 200, description = "Institution found", body = Institution),
        (status = 404, description = "Institution not found")
    ),
    tag = "institutions"
)]
pub async fn get_institution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Institution>> {
    Ok(Json(state.service.get(id).await?))
}

/// POST /v1/institutions - Add an institution (operator only)
#[utoipa::path(
    post,
    path = "/v1/institutions",
    request_body = SaveInstitutionRequest,
    responses(
        (status = 201, description = "Institution created", body = Institution),
        (status = 409, description = "Name already exists")
    ),
    tag = "institutions"
)]
pub async fn create_institution(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Json(req): Json<SaveInstitutionRequest>,
) -> ApiResult<(StatusCode, Json<Institution>)> {
    let institution = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(institution)))
}

/// PUT /v1/institutions/{id} - Update an institution (operator only)
#[utoipa::path(
    put,
    path = "/v1/institutions/{id}",
    params(("id" = i64, Path, description = "Institution ID")),
    request_body = SaveInstitutionRequest,
    responses(
        (status = 200, description = "Institution updated", body = Institution),
        (status = 404, description = "Institution not found"),
        (status = 409, description = "Name already exists")
    ),
    tag = "institutions"
)]
pub async fn update_institution(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Path(id): Path<i64>,
    Json(req): Json<SaveInstitutionRequest>,
) -> ApiResult<Json<Institution>> {
    Ok(Json(state.service.update(id, req).await?))
}

/// DELETE /v1/institutions/{id} - Remove an institution (operator only)
///
/// Blocked while attendance records hold a reference to it.
#[utoipa::path(
    delete,
    path = "/v1/institutions/{id}",
    params(("id" = i64, Path, description = "Institution ID")),
    responses(
        (status = 204, description = "Institution deleted"),
        (status = 404, description = "Institution not found"),
        (status = 409, description = "Institution is referenced by attendance records")
    ),
    tag = "institutions"
)]
pub async fn delete_institution(
    State(state): State<AppState>,
    _auth: AuthOperator,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

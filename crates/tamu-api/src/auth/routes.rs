// Auth HTTP routes: login, me, refresh, register

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use tamu_core::{LoginRequest, Operator, RegisterRequest};
use tamu_storage::{hash_password, verify_password, CreateOperator, Database};

use crate::auth::jwt::JwtService;
use crate::auth::middleware::AuthOperator;
use crate::error::{ApiError, ApiResult};

/// App state for auth routes
#[derive(Clone)]
pub struct AuthState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtService>,
}

impl AuthState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtService>) -> Self {
        Self { db, jwt }
    }
}

pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/me", get(me))
        .route("/v1/auth/refresh", post(refresh))
        .route("/v1/auth/register", post(register))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub operator: Operator,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /v1/auth/login - Exchange credentials for a JWT
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    // Same rejection for unknown email and wrong password
    let row = state
        .db
        .get_operator_by_email(req.email.trim())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&req.password, &row.password_hash)? {
        return Err(ApiError::Unauthorized);
    }

    let operator = Operator::from(row);
    let token = state.jwt.issue(&operator)?;
    tracing::info!(operator_id = operator.id, "operator logged in");

    Ok(Json(LoginResponse { token, operator }))
}

/// GET /v1/auth/me - Current operator info
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current operator", body = Operator),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AuthState>,
    auth: AuthOperator,
) -> ApiResult<Json<Operator>> {
    let row = state
        .db
        .get_operator(auth.0.sub)
        .await?
        .ok_or(ApiError::NotFound("operator"))?;
    Ok(Json(row.into()))
}

/// POST /v1/auth/refresh - Issue a fresh token for the current operator
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    responses(
        (status = 200, description = "Fresh token", body = TokenResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AuthState>,
    auth: AuthOperator,
) -> ApiResult<Json<TokenResponse>> {
    let row = state
        .db
        .get_operator(auth.0.sub)
        .await?
        .ok_or(ApiError::NotFound("operator"))?;
    let token = state.jwt.issue(&row.into())?;
    Ok(Json(TokenResponse { token }))
}

/// POST /v1/auth/register - Create an operator (superadmin only)
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Operator created", body = Operator),
        (status = 403, description = "Caller is not a superadmin"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    auth: AuthOperator,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Operator>)> {
    auth.require_superadmin()?;
    req.validate()?;

    let email = req.email.trim().to_string();
    if state.db.get_operator_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "an operator with email '{email}' already exists"
        )));
    }

    let row = state
        .db
        .create_operator(CreateOperator {
            name: req.name.trim().to_string(),
            email,
            password_hash: hash_password(&req.password)?,
            role: req.role.unwrap_or(tamu_core::OperatorRole::Admin).to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

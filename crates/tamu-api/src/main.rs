// Tamu API server
// Decision: single process owns both the REST surface and the live
//   WebSocket fan-out; room membership never leaves this process

mod attendance;
mod auth;
mod config;
mod error;
mod events;
mod export;
mod institutions;
mod live;
mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tamu_core::*;
use tamu_storage::{hash_password, CreateOperator, Database};

use crate::auth::JwtService;
use crate::config::Config;
use crate::live::EventRoomBroker;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::login,
        auth::routes::me,
        auth::routes::refresh,
        auth::routes::register,
        events::create_event,
        events::list_events,
        events::list_upcoming,
        events::list_past,
        events::get_event,
        events::get_event_by_slug,
        events::event_stats,
        events::update_event,
        events::delete_event,
        attendance::submit_attendance,
        attendance::list_event_attendance,
        attendance::export_event_attendance,
        attendance::delete_attendance,
        institutions::list_institutions,
        institutions::get_institution,
        institutions::create_institution,
        institutions::update_institution,
        institutions::delete_institution,
    ),
    components(
        schemas(
            Event, CreateEventRequest, UpdateEventRequest,
            EventStats, InstitutionRollup, CategoryRollup,
            events::EventStatsResponse,
            AttendanceRecord, AttendanceSubmission, AttendanceNotice, GuestCategory,
            attendance::EventAttendanceResponse,
            Institution, InstitutionKind, SaveInstitutionRequest,
            Operator, OperatorRole, LoginRequest, RegisterRequest,
            auth::routes::LoginResponse,
            auth::routes::TokenResponse,
            ListResponse<Event>,
            ListResponse<AttendanceRecord>,
            ListResponse<Institution>,
            Pagination,
        )
    ),
    tags(
        (name = "auth", description = "Operator authentication"),
        (name = "events", description = "Event management"),
        (name = "attendance", description = "Check-in submission and reads"),
        (name = "institutions", description = "Managed institution list")
    ),
    info(
        title = "Tamu API",
        version = "0.1.0",
        description = "Campus event guestbook: events, check-ins, and the live display feed",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Create the bootstrap operator when the table is empty and credentials are
/// configured. Keeps fresh deployments loggable-in without seeding hashes in
/// migrations.
async fn ensure_bootstrap_operator(db: &Database, config: &Config) -> Result<()> {
    let Some(bootstrap) = &config.bootstrap else {
        return Ok(());
    };
    if db.count_operators().await? > 0 {
        return Ok(());
    }
    let row = db
        .create_operator(CreateOperator {
            name: bootstrap.name.clone(),
            email: bootstrap.email.clone(),
            password_hash: hash_password(&bootstrap.password)?,
            role: OperatorRole::Superadmin.to_string(),
        })
        .await?;
    tracing::info!(operator_id = row.id, email = %row.email, "bootstrap operator created");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tamu_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tamu-api starting...");

    let config = Config::from_env()?;

    // Initialize database and run migrations
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    tracing::info!("Connected to database");

    let db = Arc::new(db);
    ensure_bootstrap_operator(&db, &config).await?;

    let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiry_hours));
    let broker = EventRoomBroker::new();

    // Create module-specific states
    let auth_state = auth::AuthState::new(db.clone(), jwt.clone());
    let events_state = events::AppState::new(db.clone());
    let attendance_state = attendance::AppState::new(db.clone(), broker.clone());
    let institutions_state = institutions::AppState::new(db.clone());
    let live_state = live::AppState {
        broker: broker.clone(),
    };

    let api_routes = Router::new()
        .merge(auth::routes(auth_state))
        .merge(events::routes(events_state))
        .merge(attendance::routes(attendance_state))
        .merge(institutions::routes(institutions_state))
        .merge(live::routes(live_state));

    let app = Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(Extension(jwt));

    // CORS only when origins are configured (UI on a different origin)
    let cors_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    };

    let app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

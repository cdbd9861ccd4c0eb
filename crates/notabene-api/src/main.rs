//! notabene-api - HTTP API server for notabene

mod auth;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use notabene_core::{
    defaults, CreateEntitlementRequest, CreateNoteRequest, EntitlementRepository,
    EntitlementRequest, Note, NoteRepository, OwnerIdentity, ReminderWindow, UpdateNoteRequest,
};
use notabene_db::{log_pool_metrics, Database};
use notabene_jobs::{EmailConfig, ReminderScanner, ScannerConfig, SmtpMailer};

use auth::require_auth;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically. Useful for
/// log correlation when chasing a misbehaving request through the scanner
/// and API logs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// CORS
// =============================================================================

/// Parse `ALLOWED_ORIGINS` (comma-separated) into header values.
///
/// Invalid entries are logged and dropped rather than failing startup.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5000".to_string());

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5000"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// OPENAPI DOCUMENTATION
// =============================================================================

/// OpenAPI documentation served to Swagger UI at `/docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notabene API",
        description = "Personal note-taking backend with reminder emails"
    ),
    paths(
        list_notes,
        list_archived_notes,
        list_pinned_notes,
        list_due_reminders,
        get_note,
        create_note,
        update_note,
        delete_note,
        set_read_notification,
        create_entitlement_request,
        list_my_requests,
        list_pending_requests,
        elevate_request,
    ),
    components(schemas(
        Note,
        EntitlementRequest,
        CreateNoteRequest,
        UpdateNoteRequest,
        CreateEntitlementRequest,
        ReadNotificationBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Notes", description = "Note CRUD and reminder queries"),
        (name = "Requests", description = "Pro entitlement requests")
    )
)]
struct ApiDoc;

/// Registers the bearer security scheme the protected paths reference.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Shared secret for validating bearer tokens from the identity provider.
    jwt_secret: String,
}

#[cfg(test)]
impl AppState {
    /// State backed by a lazy pool; no connection is made unless a handler
    /// actually touches the database.
    fn for_tests(jwt_secret: &str) -> Self {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/notabene_test")
            .expect("lazy pool");
        Self {
            db: Database::new(pool),
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "notabene_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notabene_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notabene-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/notabene".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| defaults::HTTP_PORT.to_string())
        .parse()
        .unwrap_or(defaults::HTTP_PORT);

    // The token secret has no sane default
    let jwt_secret = std::env::var("AUTH_JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("AUTH_JWT_SECRET must be set"))?;

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Create and start the reminder scanner. Without SMTP configuration the
    // scanner has nowhere to deliver, so it stays off entirely.
    let scanner_config = ScannerConfig::from_env();
    let _scanner_handle = match EmailConfig::from_env() {
        Some(email_config) if scanner_config.enabled => {
            info!("Starting reminder scanner...");
            let mailer = Arc::new(SmtpMailer::new(email_config));
            let scanner = ReminderScanner::new(
                Arc::new(db.notes.clone()),
                Arc::new(db.entitlements.clone()),
                mailer,
                scanner_config,
            );
            let handle = scanner.start();
            info!("Reminder scanner started");
            Some(handle)
        }
        Some(_) => {
            info!("Reminder scanner disabled");
            None
        }
        None => {
            warn!("SMTP_HOST not set, reminder emails will not be sent");
            None
        }
    };

    // Create app state
    let state = AppState { db, jwt_secret };

    // Periodic pool health logging
    let metrics_pool = state.db.pool.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            log_pool_metrics(&metrics_pool);
        }
    });

    // Build router
    let protected = Router::new()
        // Notes CRUD
        .route("/api/v1/notes", get(list_notes).post(create_note))
        .route("/api/v1/notes/archived", get(list_archived_notes))
        .route("/api/v1/notes/pinned", get(list_pinned_notes))
        .route("/api/v1/notes/due-reminders", get(list_due_reminders))
        .route(
            "/api/v1/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route(
            "/api/v1/notes/read-notification",
            post(set_read_notification),
        )
        // Entitlement requests
        .route("/api/v1/requests", post(create_entitlement_request))
        .route("/api/v1/requests/mine", get(list_my_requests))
        .route("/api/v1/requests/pending", get(list_pending_requests))
        .route("/api/v1/requests/:id/elevate", put(elevate_request))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        })
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_BYTES))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// NOTE HANDLERS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "Notes",
    responses((status = 200, description = "Caller's notes", body = [Note])),
    security(("bearer_auth" = []))
)]
async fn list_notes(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state.db.notes.list_for_owner(&owner.subject).await?;
    Ok(Json(notes))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/archived",
    tag = "Notes",
    responses((status = 200, description = "Caller's archived notes", body = [Note])),
    security(("bearer_auth" = []))
)]
async fn list_archived_notes(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state
        .db
        .notes
        .list_archived_for_owner(&owner.subject)
        .await?;
    Ok(Json(notes))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/pinned",
    tag = "Notes",
    responses((status = 200, description = "Caller's pinned notes", body = [Note])),
    security(("bearer_auth" = []))
)]
async fn list_pinned_notes(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state.db.notes.list_pinned_for_owner(&owner.subject).await?;
    Ok(Json(notes))
}

/// Caller's unread, unsent notes whose reminder falls within the next
/// five minutes. A shorter window than the scanner's, so the client can
/// surface a reminder in the UI just before the email goes out.
#[utoipa::path(
    get,
    path = "/api/v1/notes/due-reminders",
    tag = "Notes",
    responses((status = 200, description = "Notes due within five minutes", body = [Note])),
    security(("bearer_auth" = []))
)]
async fn list_due_reminders(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let window = ReminderWindow::from_now(
        Utc::now(),
        Duration::minutes(defaults::API_DUE_WINDOW_MINS),
    );
    let notes = state
        .db
        .notes
        .list_due_for_owner(&owner.subject, window)
        .await?;
    Ok(Json(notes))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Not found for this owner")
    ),
    security(("bearer_auth" = []))
)]
async fn get_note(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.fetch(id, &owner.subject).await?;
    Ok(Json(note))
}

#[utoipa::path(
    post,
    path = "/api/v1/notes",
    tag = "Notes",
    request_body = CreateNoteRequest,
    responses((status = 201, description = "Note created", body = Note)),
    security(("bearer_auth" = []))
)]
async fn create_note(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.insert(&owner, body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 404, description = "Not found for this owner")
    ),
    security(("bearer_auth" = []))
)]
async fn update_note(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.update(id, &owner, body).await?;
    Ok(Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses((status = 200, description = "Deleted (no-op when absent)")),
    security(("bearer_auth" = []))
)]
async fn delete_note(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.notes.delete(id, &owner.subject).await?;
    Ok(Json(serde_json::json!({
        "success": true,
    })))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
struct ReadNotificationBody {
    note_id: Uuid,
    read_notification: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/notes/read-notification",
    tag = "Notes",
    request_body = ReadNotificationBody,
    responses((status = 200, description = "Flag updated (no-op when absent)")),
    security(("bearer_auth" = []))
)]
async fn set_read_notification(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Json(body): Json<ReadNotificationBody>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .notes
        .set_read_notification(body.note_id, &owner.subject, body.read_notification)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
    })))
}

// =============================================================================
// ENTITLEMENT REQUEST HANDLERS
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/requests",
    tag = "Requests",
    request_body = CreateEntitlementRequest,
    responses((status = 201, description = "Request created", body = EntitlementRequest)),
    security(("bearer_auth" = []))
)]
async fn create_entitlement_request(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
    Json(body): Json<CreateEntitlementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state.db.entitlements.insert(&owner, body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/mine",
    tag = "Requests",
    responses((status = 200, description = "Caller's requests", body = [EntitlementRequest])),
    security(("bearer_auth" = []))
)]
async fn list_my_requests(
    State(state): State<AppState>,
    Extension(owner): Extension<OwnerIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state.db.entitlements.list_for_owner(&owner.subject).await?;
    Ok(Json(requests))
}

/// All not-yet-elevated requests, across owners. Administrative; any
/// authenticated caller can see these until role claims land.
#[utoipa::path(
    get,
    path = "/api/v1/requests/pending",
    tag = "Requests",
    responses((status = 200, description = "All not-yet-elevated requests", body = [EntitlementRequest])),
    security(("bearer_auth" = []))
)]
async fn list_pending_requests(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state.db.entitlements.list_pending().await?;
    Ok(Json(requests))
}

#[utoipa::path(
    put,
    path = "/api/v1/requests/{id}/elevate",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Elevated request", body = EntitlementRequest),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
async fn elevate_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state.db.entitlements.elevate(id).await?;
    Ok(Json(request))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Database(notabene_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
}

impl From<notabene_core::Error> for ApiError {
    fn from(err: notabene_core::Error) -> Self {
        match &err {
            notabene_core::Error::NoteNotFound(id) => {
                ApiError::NotFound(format!("Note {} not found", id))
            }
            notabene_core::Error::RequestNotFound(id) => {
                ApiError::NotFound(format!("Request {} not found", id))
            }
            notabene_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            notabene_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            notabene_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            notabene_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_valid_uuid() {
        let mut maker = MakeRequestUuidV7;
        let req = axum::http::Request::builder().body(()).unwrap();
        let id = maker.make_request_id(&req).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_allowed_origins_default() {
        // No ALLOWED_ORIGINS in the test environment
        std::env::remove_var("ALLOWED_ORIGINS");
        let origins = parse_allowed_origins();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn test_note_not_found_maps_to_404() {
        let id = Uuid::now_v7();
        let api_err: ApiError = notabene_core::Error::NoteNotFound(id).into();
        match api_err {
            ApiError::NotFound(msg) => assert!(msg.contains(&id.to_string())),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_request_not_found_maps_to_404() {
        let id = Uuid::now_v7();
        let api_err: ApiError = notabene_core::Error::RequestNotFound(id).into();
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let api_err: ApiError = notabene_core::Error::InvalidInput("bad".into()).into();
        assert!(matches!(api_err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = ApiError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "missing");
    }

    #[test]
    fn test_openapi_doc_covers_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["paths"]["/api/v1/notes"].get("get").is_some());
        assert!(json["paths"]["/api/v1/notes"].get("post").is_some());
        assert!(json["paths"]["/api/v1/notes/{id}"].get("put").is_some());
        assert!(json["paths"]["/api/v1/requests/{id}/elevate"]
            .get("put")
            .is_some());
        assert!(json["components"]["schemas"]["Note"].is_object());
        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[test]
    fn test_read_notification_body_parses() {
        let body: ReadNotificationBody = serde_json::from_str(
            r#"{"note_id": "0190e0f0-0000-7000-8000-000000000000", "read_notification": true}"#,
        )
        .unwrap();
        assert!(body.read_notification);
    }
}

//! HTTP server exposing the dismissal endpoint.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/hints` | Dismiss one suggestion permanently |
//! | `POST` | `/search-results` | Intercept a marketplace result list |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a machine-readable code:
//!
//! ```json
//! { "error": { "code": "invalid_param", "message": "hint must be a registered module id" } }
//! ```
//!
//! Codes: `unauthorized` (401), `invalid_param` (400), `not_dismissed`
//! (400). Dismissing an already-dismissed hint is a success, not an error.
//!
//! # Authorization
//!
//! `POST /hints` requires the configured capability token as a bearer
//! credential; requests without it are rejected before the body is even
//! validated.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::models::{QueryContext, ResultList};
use crate::pipeline::HintsContext;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
struct AppState {
    ctx: Arc<HintsContext>,
}

/// Starts the HTTP server on the configured bind address.
///
/// Runs indefinitely until the process is terminated.
pub async fn run_server(ctx: Arc<HintsContext>) -> anyhow::Result<()> {
    let bind_addr = ctx.config().server.bind.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(ctx);
    let app = app.layer(cors);

    println!("Suggestion server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the route table. Split out of [`run_server`] so tests can drive
/// the handlers without binding a socket.
pub fn router(ctx: Arc<HintsContext>) -> Router {
    Router::new()
        .route("/hints", post(handle_dismiss))
        .route("/search-results", post(handle_search_results))
        .route("/health", get(handle_health))
        .with_state(AppState { ctx })
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"invalid_param"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// 401 for a missing or wrong capability credential.
fn unauthorized() -> AppError {
    AppError {
        status: StatusCode::UNAUTHORIZED,
        code: "unauthorized".to_string(),
        message: "capability credential required".to_string(),
    }
}

/// 400 for a malformed or unknown request parameter.
fn invalid_param(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "invalid_param".to_string(),
        message: message.into(),
    }
}

/// 400 for a dismissal whose persisted write failed.
fn not_dismissed() -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "not_dismissed".to_string(),
        message: "The card could not be dismissed".to_string(),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /hints ============

/// Handler for `POST /hints`.
///
/// Body: `{"hint": "<descriptor id>"}`. The capability check runs first,
/// then parameter validation, and only then is any state touched. The
/// operation is idempotent.
async fn handle_dismiss(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    // Raw bytes so the capability check always runs before any body
    // validation can reject the request.
    require_capability(&state, &headers)?;

    let parsed: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| invalid_param("request body must be a JSON object"))?;

    let hint = parsed
        .get("hint")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid_param("hint is required and must be a string"))?;

    if !state.ctx.catalog().contains(hint) {
        return Err(invalid_param(format!(
            "hint must be a registered module id, got '{}'",
            hint
        )));
    }

    if state.ctx.dismissals().dismiss(hint).await {
        Ok(Json(serde_json::json!({ "code": "success" })))
    } else {
        Err(not_dismissed())
    }
}

/// Compares the bearer token against the configured capability token.
fn require_capability(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let expected = &state.ctx.config().server.capability_token;

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(unauthorized()),
    }
}

// ============ POST /search-results ============

/// Request body for `POST /search-results`: the host's result list plus
/// the query context of the search being rendered.
#[derive(serde::Deserialize)]
struct SearchResultsRequest {
    #[serde(default)]
    results: ResultList,
    #[serde(flatten)]
    query: QueryContext,
}

/// Handler for `POST /search-results`.
///
/// The HTTP face of the interception boundary, for hosts that call out
/// over the network instead of linking the library. Always succeeds: a
/// query that matches nothing simply echoes the list back.
async fn handle_search_results(
    State(state): State<AppState>,
    Json(request): Json<SearchResultsRequest>,
) -> Json<serde_json::Value> {
    let augmented = state.ctx.augment(request.results, &request.query).await;
    Json(serde_json::json!({ "results": augmented }))
}

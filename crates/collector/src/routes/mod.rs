//! HTTP route handlers for the collector.
//!
//! # Route Structure
//!
//! ```text
//! ANY  /fingerprint.js   - Browser fingerprint script
//! POST /log              - Store a fingerprint (any other method: 405)
//!                          body read and size-limited only when the
//!                          capture profile is `extended`
//! ANY  /view             - All records, newest first (bearer token required)
//! *                      - 404
//! ```

pub mod ingest;
pub mod script;
pub mod view;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, post},
};
use tower_http::trace::TraceLayer;

use fingerprint_core::CaptureProfile;

use crate::error::AppError;
use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// Path serving the fingerprint script.
pub const SCRIPT_PATH: &str = "/fingerprint.js";
/// Ingestion path the script posts to.
pub const LOG_PATH: &str = "/log";
/// Retrieval path.
pub const VIEW_PATH: &str = "/view";

/// Create the collector routes router.
///
/// The ingestion handler is chosen from the capture profile.
pub fn routes(profile: CaptureProfile, max_body_bytes: usize) -> Router<AppState> {
    let log = if profile.reads_body() {
        post(ingest::log_fingerprint).layer(DefaultBodyLimit::max(max_body_bytes))
    } else {
        post(ingest::log_headers)
    };

    Router::new()
        .route(SCRIPT_PATH, any(script::serve))
        .route(LOG_PATH, log.fallback(ingest::method_not_allowed))
        .route(VIEW_PATH, any(view::list_fingerprints))
        .fallback(not_found)
}

/// Build the complete application with tracing and request IDs.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    routes(config.capture_profile, config.max_body_bytes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Fallback for every unrecognized path, including `/`.
async fn not_found() -> AppError {
    AppError::NotFound
}

//! Integration tests for the fingerprint collector.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services)
//! cargo test -p fingerprint-integration-tests
//!
//! # Live server and database tests
//! FINGERPRINT_BASE_URL=http://127.0.0.1:8787 \
//! FINGERPRINT_VIEW_TOKEN=... \
//! DATABASE_URL=postgres://... \
//!     cargo test -p fingerprint-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `collector_flow` - Full request flows against an in-memory router
//! - `live_server` - HTTP tests against a running collector
//! - `postgres_store` - `PgFingerprintStore` against a real database

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fingerprint_collector::{AppState, CollectorConfig, app, db::MemoryFingerprintStore};
use fingerprint_core::CaptureProfile;

/// Bearer token used by the in-memory harness.
pub const VIEW_TOKEN: &str = "Zq8#mV3!tR6@wP1$xK5%";

/// Base URL of a running collector for live tests.
#[must_use]
pub fn collector_base_url() -> String {
    std::env::var("FINGERPRINT_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8787".to_string())
}

/// A collector router wired to a fresh in-memory store.
pub struct Harness {
    router: Router,
    pub store: Arc<MemoryFingerprintStore>,
}

/// Status, headers and body text of a completed request.
pub struct Reply {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl Harness {
    /// Harness using the extended capture profile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(CaptureProfile::Extended)
    }

    /// Harness using the given capture profile.
    #[must_use]
    pub fn with_profile(profile: CaptureProfile) -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("FINGERPRINT_STORE", "memory".to_string()),
            ("FINGERPRINT_VIEW_TOKEN", VIEW_TOKEN.to_string()),
            ("FINGERPRINT_CAPTURE_PROFILE", profile.to_string()),
        ]);
        let config = CollectorConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("harness configuration is valid");

        let store = Arc::new(MemoryFingerprintStore::new());
        let router = app(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();

        Reply {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// POST a JSON body to `/log` from the given client IP.
    pub async fn log(&self, body: &str, ip: &str) -> Reply {
        self.send(
            Request::post("/log")
                .header(header::CONTENT_TYPE, "application/json")
                .header("cf-connecting-ip", ip)
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }

    /// GET `/view` with an optional `Authorization` header value.
    pub async fn view(&self, authorization: Option<&str>) -> Reply {
        let mut builder = Request::get("/view");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// `Authorization` value accepted by [`Harness`].
#[must_use]
pub fn bearer() -> String {
    format!("Bearer {VIEW_TOKEN}")
}

/// A fingerprint body with the given user agent and screen width.
#[must_use]
pub fn payload(user_agent: &str, width: i32) -> String {
    serde_json::json!({
        "userAgent": user_agent,
        "platform": "Linux x86_64",
        "language": "en-GB",
        "screen": { "width": width, "height": 1080 },
        "timezone": "Europe/London",
        "referrer": "https://example.com/landing",
    })
    .to_string()
}

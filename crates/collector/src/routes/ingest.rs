//! Ingestion route handlers.
//!
//! One submission produces exactly one `INSERT`. What the record contains
//! depends on the configured [`CaptureProfile`], which picks the handler
//! mounted on the ingestion path:
//!
//! - `extended` ([`log_fingerprint`]) decodes the JSON body posted by the
//!   fingerprint script
//! - `minimal` ([`log_headers`]) never reads the body and records the
//!   `User-Agent` header
//!
//! Both take `ip` from the trusted client IP header. Repeated submissions
//! are never deduplicated.
//!
//! [`CaptureProfile`]: fingerprint_core::CaptureProfile

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
};

use fingerprint_core::{ClientIp, FingerprintPayload, NewFingerprint};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body returned after a record is stored.
pub const RECORDED: &str = "fingerprint recorded";

/// Store a fingerprint decoded from the request body.
///
/// # Errors
///
/// Returns `AppError::InvalidPayload` if the body does not decode, and
/// `AppError::Database` if the insert fails.
pub async fn log_fingerprint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str)> {
    let payload = FingerprintPayload::decode(&body).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected fingerprint payload");
    })?;

    let ip = client_ip(&state, &headers);
    record(&state, NewFingerprint::from_payload(payload, ip)).await
}

/// Store the `User-Agent` header and client IP, leaving the body unread.
///
/// # Errors
///
/// Returns `AppError::Database` if the insert fails.
pub async fn log_headers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, &'static str)> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let ip = client_ip(&state, &headers);
    record(&state, NewFingerprint::from_headers(user_agent, ip)).await
}

/// Any method other than `POST` on the ingestion path.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn client_ip(state: &AppState, headers: &HeaderMap) -> ClientIp {
    ClientIp::from_header(
        headers
            .get(&state.config().client_ip_header)
            .and_then(|value| value.to_str().ok()),
    )
}

async fn record(
    state: &AppState,
    fingerprint: NewFingerprint,
) -> Result<(StatusCode, &'static str)> {
    let record = state.store().insert(fingerprint).await?;

    tracing::info!(
        id = %record.id,
        profile = %state.config().capture_profile,
        ip = %record.ip,
        "Fingerprint recorded"
    );

    Ok((StatusCode::CREATED, RECORDED))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use chrono::Datelike;
    use fingerprint_core::{CaptureProfile, FingerprintId};

    use crate::db::FingerprintStore;
    use crate::routes::LOG_PATH;
    use crate::test_support::{STORE_FAILURE, failing_app, memory_app, memory_app_with};

    const PAYLOAD: &str = r#"{
        "userAgent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
        "platform": "Win32",
        "language": "pt-BR",
        "screen": { "width": 1920, "height": 1080 },
        "timezone": "America/Sao_Paulo",
        "referrer": "https://news.example/"
    }"#;

    async fn post(app: Router, body: &str, ip: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::post(LOG_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "header-agent/1.0");
        if let Some(ip) = ip {
            request = request.header("cf-connecting-ip", ip);
        }

        let response = app
            .oneshot(request.body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_extended_payload_is_stored_verbatim() {
        let (app, store) = memory_app();

        let (status, body) = post(app, PAYLOAD, Some("203.0.113.7")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, super::RECORDED);

        let records = store.list_recent().await.unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, FingerprintId::new(1));
        assert_eq!(
            record.user_agent.as_deref(),
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
        );
        assert_eq!(record.platform.as_deref(), Some("Win32"));
        assert_eq!(record.language.as_deref(), Some("pt-BR"));
        assert_eq!(record.screen_width, Some(1920));
        assert_eq!(record.screen_height, Some(1080));
        assert_eq!(record.timezone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(record.referrer.as_deref(), Some("https://news.example/"));
        assert_eq!(record.ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_missing_ip_header_stores_unknown() {
        let (app, store) = memory_app();

        let (status, _) = post(app, PAYLOAD, None).await;
        assert_eq!(status, StatusCode::CREATED);

        let records = store.list_recent().await.unwrap();
        assert_eq!(records[0].ip, "unknown");
    }

    #[tokio::test]
    async fn test_missing_screen_is_bad_request() {
        let (app, store) = memory_app();

        let (status, body) = post(app, r#"{"userAgent":"ua"}"#, Some("203.0.113.7")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "invalid fingerprint payload: missing required field `screen`"
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, store) = memory_app();

        let (status, _) = post(app, "userAgent=ua", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected_without_storing() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::HEAD] {
            let (app, store) = memory_app();
            let response = app
                .oneshot(
                    Request::builder()
                        .method(method.clone())
                        .uri(LOG_PATH)
                        .body(Body::from(PAYLOAD))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{method}"
            );
            assert!(store.is_empty().await);
        }
    }

    #[tokio::test]
    async fn test_minimal_profile_records_headers_only() {
        let (app, store) = memory_app_with(CaptureProfile::Minimal);

        let (status, _) = post(app, PAYLOAD, Some("198.51.100.23")).await;
        assert_eq!(status, StatusCode::CREATED);

        let records = store.list_recent().await.unwrap();
        let record = &records[0];
        assert_eq!(record.user_agent.as_deref(), Some("header-agent/1.0"));
        assert_eq!(record.ip, "198.51.100.23");
        assert_eq!(record.platform, None);
        assert_eq!(record.screen_width, None);
        assert_eq!(record.timezone, None);
    }

    #[tokio::test]
    async fn test_minimal_profile_accepts_empty_body() {
        let (app, store) = memory_app_with(CaptureProfile::Minimal);

        let (status, _) = post(app, "", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.list_recent().await.unwrap()[0].ip, "unknown");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let (app, store) = memory_app();
        let referrer = "r".repeat(32 * 1024);
        let body = format!(
            r#"{{"screen":{{"width":1,"height":1}},"referrer":"{referrer}"}}"#
        );

        let (status, _) = post(app, &body, None).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_minimal_profile_ignores_oversized_body() {
        let (app, store) = memory_app_with(CaptureProfile::Minimal);
        let body = "x".repeat(32 * 1024);

        let (status, _) = post(app, &body, Some("198.51.100.9")).await;
        assert_eq!(status, StatusCode::CREATED);

        let records = store.list_recent().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_agent.as_deref(), Some("header-agent/1.0"));
    }

    #[tokio::test]
    async fn test_client_supplied_id_and_timestamp_are_ignored() {
        let (app, store) = memory_app();
        let body = r#"{
            "id": 999,
            "timestamp": "1999-01-01T00:00:00Z",
            "screen": { "width": 640, "height": 480 }
        }"#;

        let (status, _) = post(app, body, None).await;
        assert_eq!(status, StatusCode::CREATED);

        let records = store.list_recent().await.unwrap();
        assert_eq!(records[0].id, FingerprintId::new(1));
        assert!(records[0].timestamp.year() > 1999);
        assert_eq!(records[0].screen_width, Some(640));
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let (status, body) = post(failing_app(), PAYLOAD, Some("203.0.113.7")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "internal server error");
        assert!(!body.contains(STORE_FAILURE));
    }
}

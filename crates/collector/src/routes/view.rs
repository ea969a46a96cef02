//! Retrieval route handler.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::middleware::RequireViewToken;
use crate::state::AppState;

/// Return every stored record, newest first, as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` (via the extractor) without touching the
/// store when the bearer token does not match, and `AppError::Database` if
/// the query fails.
pub async fn list_fingerprints(
    _auth: RequireViewToken,
    State(state): State<AppState>,
) -> Result<Response> {
    let records = state.store().list_recent().await?;

    let body = serde_json::to_string_pretty(&records)
        .map_err(|e| AppError::Internal(format!("failed to serialize records: {e}")))?;

    tracing::debug!(count = records.len(), "Listed fingerprints");

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use fingerprint_core::{ClientIp, NewFingerprint};

    use crate::db::FingerprintStore;
    use crate::routes::VIEW_PATH;
    use crate::test_support::{STORE_FAILURE, VIEW_TOKEN, failing_app, memory_app};

    fn view(authorization: Option<&str>) -> Request<Body> {
        let mut request = Request::get(VIEW_PATH);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        request.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_missing_or_wrong_credentials() {
        let wrong_case = format!("bearer {VIEW_TOKEN}");
        let trailing = format!("Bearer {VIEW_TOKEN} ");
        let bare = VIEW_TOKEN.to_string();

        for authorization in [
            None,
            Some(""),
            Some("Bearer"),
            Some("Bearer wrong-token"),
            Some(wrong_case.as_str()),
            Some(trailing.as_str()),
            Some(bare.as_str()),
        ] {
            let (app, store) = memory_app();
            store
                .insert(NewFingerprint::from_headers(
                    Some("private".to_string()),
                    ClientIp::Unknown,
                ))
                .await
                .unwrap();

            let response = app.oneshot(view(authorization)).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{authorization:?}"
            );
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&body[..], b"unauthorized");
        }
    }

    #[tokio::test]
    async fn test_lists_records_newest_first() {
        let (app, store) = memory_app();
        for agent in ["A", "B", "C"] {
            store
                .insert(NewFingerprint::from_headers(
                    Some(agent.to_string()),
                    ClientIp::Unknown,
                ))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(view(Some(format!("Bearer {VIEW_TOKEN}").as_str())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("\n  "), "expected pretty-printed JSON");

        let json: Value = serde_json::from_str(&text).unwrap();
        let agents: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["user_agent"].as_str().unwrap())
            .collect();
        assert_eq!(agents, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_array() {
        let (app, _) = memory_app();
        let response = app
            .oneshot(view(Some(format!("Bearer {VIEW_TOKEN}").as_str())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let response = failing_app()
            .oneshot(view(Some(format!("Bearer {VIEW_TOKEN}").as_str())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text, "internal server error");
        assert!(!text.contains(STORE_FAILURE));
    }

    #[tokio::test]
    async fn test_credentials_are_checked_before_the_store() {
        let response = failing_app().oneshot(view(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

//! Fingerprint script route handler.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

/// Script that collects browser properties and posts them to the ingestion path.
pub const FINGERPRINT_SCRIPT: &str = include_str!("../../assets/fingerprint.js");

/// Serve the fingerprint script.
pub async fn serve() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        FINGERPRINT_SCRIPT,
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::FINGERPRINT_SCRIPT;
    use crate::routes::{LOG_PATH, SCRIPT_PATH};
    use crate::test_support::memory_app;

    #[test]
    fn test_script_collects_every_field() {
        for property in [
            "navigator.userAgent",
            "navigator.platform",
            "navigator.language",
            "screen.width",
            "screen.height",
            "resolvedOptions().timeZone",
            "document.referrer",
            "JSON.stringify",
        ] {
            assert!(FINGERPRINT_SCRIPT.contains(property), "missing {property}");
        }
    }

    #[test]
    fn test_script_posts_json_to_log_path() {
        assert!(FINGERPRINT_SCRIPT.contains(&format!("fetch('{LOG_PATH}'")));
        assert!(FINGERPRINT_SCRIPT.contains("method: 'POST'"));
        assert!(FINGERPRINT_SCRIPT.contains("'Content-Type': 'application/json'"));
    }

    #[tokio::test]
    async fn test_get_script() {
        let (app, store) = memory_app();
        let response = app
            .oneshot(Request::get(SCRIPT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], FINGERPRINT_SCRIPT.as_bytes());
        assert!(store.is_empty().await);
    }
}

//! Bearer token extractor for the retrieval path.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires `Authorization: Bearer <view token>`.
///
/// The whole header value is compared, case-sensitively, against the
/// configured token in constant time. A missing header, a non-text header
/// or any mismatch rejects with [`AppError::Unauthorized`] before the
/// handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_: RequireViewToken) -> &'static str {
///     "only for holders of the view token"
/// }
/// ```
pub struct RequireViewToken;

impl FromRequestParts<AppState> for RequireViewToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.as_bytes())
            .unwrap_or_default();

        let expected = state.config().expected_authorization();

        if bool::from(presented.ct_eq(expected.as_bytes())) {
            Ok(Self)
        } else {
            tracing::warn!(
                header_present = parts.headers.contains_key(AUTHORIZATION),
                "Rejected retrieval request with invalid credentials"
            );
            Err(AppError::Unauthorized)
        }
    }
}

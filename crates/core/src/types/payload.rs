//! Browser-submitted fingerprint payload.
//!
//! The body posted by the fingerprint script is untrusted. It is decoded and
//! validated in one step so that handlers never read a field that may be
//! missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors that can occur when decoding a [`FingerprintPayload`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// The body is not valid JSON.
    #[error("body is not valid JSON: {0}")]
    Malformed(String),
    /// The body is valid JSON but not an object.
    #[error("body must be a JSON object")]
    NotAnObject,
    /// A required field is absent or null.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A field is present but has the wrong type.
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable description of the expected type.
        expected: &'static str,
    },
}

/// Screen dimensions reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// `screen.width` in CSS pixels.
    pub width: i32,
    /// `screen.height` in CSS pixels.
    pub height: i32,
}

/// The JSON object the fingerprint script submits to the ingestion path.
///
/// Text fields are optional and stored as null when absent. The `screen`
/// object is required; a payload without it is rejected rather than stored
/// with defaulted dimensions.
///
/// ## Examples
///
/// ```
/// use fingerprint_core::{FingerprintPayload, PayloadError};
///
/// let body = br#"{"userAgent":"Mozilla/5.0","screen":{"width":1920,"height":1080}}"#;
/// let payload = FingerprintPayload::decode(body).unwrap();
/// assert_eq!(payload.screen.width, 1920);
/// assert_eq!(payload.platform, None);
///
/// let missing = FingerprintPayload::decode(br#"{"userAgent":"Mozilla/5.0"}"#);
/// assert_eq!(missing.unwrap_err(), PayloadError::MissingField("screen"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintPayload {
    /// `navigator.userAgent`
    #[serde(default)]
    pub user_agent: Option<String>,
    /// `navigator.platform`
    #[serde(default)]
    pub platform: Option<String>,
    /// `navigator.language`
    #[serde(default)]
    pub language: Option<String>,
    /// `screen.width` / `screen.height`
    pub screen: ScreenSize,
    /// Resolved IANA time zone name.
    #[serde(default)]
    pub timezone: Option<String>,
    /// `document.referrer`; an empty string is kept as-is.
    #[serde(default)]
    pub referrer: Option<String>,
}

/// JSON keys of the optional text fields.
const TEXT_FIELDS: &[&str] = &["userAgent", "platform", "language", "timezone", "referrer"];

impl FingerprintPayload {
    /// Decode and validate a request body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body:
    /// - Is not valid JSON, or is not a JSON object
    /// - Has no `screen` object, or `screen` lacks integer `width`/`height`
    /// - Has a non-string, non-null value in one of the text fields
    pub fn decode(body: &[u8]) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;

        let Value::Object(fields) = &value else {
            return Err(PayloadError::NotAnObject);
        };

        for key in TEXT_FIELDS {
            if let Some(v) = fields.get(*key)
                && !(v.is_string() || v.is_null())
            {
                return Err(PayloadError::InvalidField {
                    field: *key,
                    expected: "a string",
                });
            }
        }

        let screen = match fields.get("screen") {
            None | Some(Value::Null) => return Err(PayloadError::MissingField("screen")),
            Some(Value::Object(screen)) => screen,
            Some(_) => {
                return Err(PayloadError::InvalidField {
                    field: "screen",
                    expected: "an object",
                });
            }
        };

        check_dimension(screen.get("width"), "screen.width")?;
        check_dimension(screen.get("height"), "screen.height")?;

        serde_json::from_value(value).map_err(|e| PayloadError::Malformed(e.to_string()))
    }
}

fn check_dimension(value: Option<&Value>, field: &'static str) -> Result<(), PayloadError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Err(PayloadError::MissingField(field));
    };

    match value.as_i64() {
        Some(n) if i32::try_from(n).is_ok() => Ok(()),
        _ => Err(PayloadError::InvalidField {
            field,
            expected: "a 32-bit integer",
        }),
    }
}

//! Capture profile selecting which attributes the ingestion path records.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a capture profile name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown capture profile `{0}` (expected `extended` or `minimal`)")]
pub struct ParseProfileError(pub String);

/// Which attributes a submission contributes to a stored record.
///
/// - `Extended` decodes the JSON body posted by the fingerprint script.
/// - `Minimal` ignores the body and records only the `User-Agent` header
///   and the client IP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureProfile {
    /// Headers only.
    Minimal,
    /// Full browser payload.
    #[default]
    Extended,
}

impl CaptureProfile {
    /// Lowercase name used in configuration and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Extended => "extended",
        }
    }

    /// Whether this profile reads the request body.
    #[must_use]
    pub const fn reads_body(&self) -> bool {
        matches!(self, Self::Extended)
    }
}

impl fmt::Display for CaptureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureProfile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "extended" => Ok(Self::Extended),
            other => Err(ParseProfileError(other.to_string())),
        }
    }
}

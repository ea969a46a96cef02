//! Client IP as reported by the edge.

use core::fmt;

use serde::{Serialize, Serializer};

/// The client address taken from the trusted client-IP header.
///
/// The header is set by the hosting edge and is stored verbatim. When the
/// header is missing or empty the record carries the [`ClientIp::UNKNOWN`]
/// sentinel instead.
///
/// ```
/// use fingerprint_core::ClientIp;
///
/// assert_eq!(ClientIp::from_header(Some("203.0.113.9")).as_str(), "203.0.113.9");
/// assert_eq!(ClientIp::from_header(Some("")).as_str(), "unknown");
/// assert_eq!(ClientIp::from_header(None), ClientIp::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientIp {
    /// Value of the trusted header.
    Known(String),
    /// Header absent.
    Unknown,
}

impl ClientIp {
    /// Sentinel stored when the trusted header is absent.
    pub const UNKNOWN: &'static str = "unknown";

    /// Build from the raw header value, if any.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(ip) if !ip.is_empty() => Self::Known(ip.to_owned()),
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(ip) => ip,
            Self::Unknown => Self::UNKNOWN,
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Known(ip) => ip,
            Self::Unknown => Self::UNKNOWN.to_owned(),
        }
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ClientIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

//! Stored fingerprint records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClientIp, FingerprintId, FingerprintPayload};

/// A fingerprint row as stored in the `fingerprints` table.
///
/// Field names match the column names, so the JSON produced for the
/// retrieval path mirrors a `SELECT *` of the table. `id` and `timestamp`
/// are assigned by the store on insertion and never by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct FingerprintRecord {
    pub id: FingerprintId,
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub timezone: Option<String>,
    pub referrer: Option<String>,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
}

/// The caller-supplied part of a record, ready to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFingerprint {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub timezone: Option<String>,
    pub referrer: Option<String>,
    pub ip: String,
}

impl NewFingerprint {
    /// Build a record from a validated browser payload.
    #[must_use]
    pub fn from_payload(payload: FingerprintPayload, ip: ClientIp) -> Self {
        Self {
            user_agent: payload.user_agent,
            platform: payload.platform,
            language: payload.language,
            screen_width: Some(payload.screen.width),
            screen_height: Some(payload.screen.height),
            timezone: payload.timezone,
            referrer: payload.referrer,
            ip: ip.into_string(),
        }
    }

    /// Build a record carrying only the user agent and client IP.
    #[must_use]
    pub fn from_headers(user_agent: Option<String>, ip: ClientIp) -> Self {
        Self {
            user_agent,
            ip: ip.into_string(),
            ..Self::default()
        }
    }

    /// Attach the store-assigned identity and creation time.
    #[must_use]
    pub fn into_record(self, id: FingerprintId, timestamp: DateTime<Utc>) -> FingerprintRecord {
        FingerprintRecord {
            id,
            user_agent: self.user_agent,
            platform: self.platform,
            language: self.language,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            timezone: self.timezone,
            referrer: self.referrer,
            ip: self.ip,
            timestamp,
        }
    }
}

//! Core types for the fingerprint collector.
//!
//! This module provides type-safe wrappers for the stored record and the
//! untrusted data a browser submits.

pub mod client_ip;
pub mod id;
pub mod payload;
pub mod profile;
pub mod record;

pub use client_ip::ClientIp;
pub use id::*;
pub use payload::{FingerprintPayload, PayloadError, ScreenSize};
pub use profile::{CaptureProfile, ParseProfileError};
pub use record::{FingerprintRecord, NewFingerprint};

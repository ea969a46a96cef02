//! Fingerprint Core - Shared types library.
//!
//! This crate provides the domain types used across the fingerprint collector:
//! - `collector` - HTTP service that serves the script and stores submissions
//! - `cli` - Command-line tools for migrations and exports
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Database encoding is opt-in through the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Record and ID types, client payload decoding, capture profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

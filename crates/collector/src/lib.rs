//! Fingerprint collector library.
//!
//! This crate provides the collector service as a library, allowing it to be
//! tested in-process and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::{CollectorConfig, ConfigError, StoreBackend};
pub use error::AppError;
pub use routes::app;
pub use state::AppState;

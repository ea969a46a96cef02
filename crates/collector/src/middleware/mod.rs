//! HTTP middleware and extractors for the collector.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (propagate or generate `x-request-id`)
//!
//! The retrieval path additionally uses the [`RequireViewToken`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::RequireViewToken;
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};

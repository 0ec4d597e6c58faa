//! HTTP layer for Antigravity.
//!
//! Keep-alive endpoints (`/`, `/health`) plus a token-guarded JSON API at
//! `/api/v1/` using the envelope response format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;

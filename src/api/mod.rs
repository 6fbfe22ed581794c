//! HTTP API for the extraction service.
//!
//! ## Endpoints
//!
//! - `GET /` - Liveness text
//! - `GET /api/health` - Health check
//! - `POST /api/extract-tasks` - Extract task candidates from a transcript

mod error;
mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
pub use types::*;

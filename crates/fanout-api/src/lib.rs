//! Fanout HTTP API
//!
//! axum server exposing the multipart upload endpoint, the per-session progress stream
//! and health probes.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use setup::routes::setup_routes;
pub use state::AppState;

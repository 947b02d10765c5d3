//! Beacon console server
//!
//! HTTP surface over report ingestion, feedback threads and the release
//! lifecycle.

pub mod auth; // Token verification
pub mod console; // Console API handlers
pub mod error; // Error handling and types
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, state and response types
pub mod secured; // Authorization guard
pub mod service; // Report and feedback services
pub mod startup; // Application startup utilities

pub use model::{AppState, Configuration};

//! Beacon Common - Shared types and utilities
//!
//! This crate provides the foundational pieces used by every Beacon component:
//! - Error types and error codes
//! - Input helpers (trimming, required fields, page windows)
//! - Common constants

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{BeaconError, ErrorCode};
pub use utils::{is_valid, optional_trimmed, page_window, required};

/// Default page size of the latest-per-user aggregation
pub const DEFAULT_AGGREGATE_PAGE_SIZE: u64 = 20;

/// Default page size of a user's report history
pub const DEFAULT_HISTORY_PAGE_SIZE: u64 = 10;

/// Default page size of the feedback listing
pub const DEFAULT_FEEDBACK_PAGE_SIZE: u64 = 20;

/// Upper bound for any requested page size
pub const MAX_PAGE_SIZE: u64 = 500;

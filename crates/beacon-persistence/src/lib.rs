//! Beacon Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions for reports, feedback and versions
//! - Persistence trait abstractions used by the service layers
//! - Domain model types decoupled from the storage backend
//! - Schema bootstrap for MySQL, PostgreSQL and SQLite

pub mod entity;
pub mod model;
pub mod schema;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export persistence traits
pub use traits::{FeedbackPersistence, PersistenceService, ReportPersistence, VersionPersistence};

// Re-export SQL backend
pub use sql::ExternalDbPersistService;

// Re-export schema bootstrap
pub use schema::create_schema;

// Re-export model types
pub use model::{
    FeedbackInfo, FeedbackReply, FeedbackStatus, NewFeedback, NewReply, NewReport, NewVersion,
    Page, ReportInfo, UpdateType, VersionChanges, VersionInfo, VersionStatus,
};

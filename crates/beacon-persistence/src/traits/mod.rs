//! Persistence traits for the storage abstraction layer
//!
//! The service layers only talk to these traits; `ExternalDbPersistService`
//! implements them over a SeaORM connection.

pub mod feedback;
pub mod report;
pub mod version;

pub use feedback::FeedbackPersistence;
pub use report::ReportPersistence;
pub use version::VersionPersistence;

use async_trait::async_trait;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService:
    ReportPersistence + FeedbackPersistence + VersionPersistence + Send + Sync
{
    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}

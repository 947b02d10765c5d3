//! Version persistence trait

use async_trait::async_trait;

use crate::model::{NewVersion, VersionChanges, VersionInfo};

/// Version persistence operations
#[async_trait]
pub trait VersionPersistence: Send + Sync {
    /// Store a new version in `draft` state
    async fn version_create(&self, version: NewVersion) -> anyhow::Result<VersionInfo>;

    /// Get a version by its ID
    async fn version_find_by_id(&self, id: i64) -> anyhow::Result<Option<VersionInfo>>;

    /// All versions of a project, newest first
    async fn version_find_by_project(&self, project_id: &str)
    -> anyhow::Result<Vec<VersionInfo>>;

    /// Check whether a version number is taken in a project, ignoring `exclude_id`
    async fn version_number_exists(
        &self,
        project_id: &str,
        version_number: &str,
        exclude_id: Option<i64>,
    ) -> anyhow::Result<bool>;

    /// Apply a partial update
    async fn version_update(
        &self,
        id: i64,
        changes: VersionChanges,
    ) -> anyhow::Result<Option<VersionInfo>>;

    /// Publish a version and deprecate every other published version of
    /// its project in one transaction
    async fn version_promote(&self, id: i64) -> anyhow::Result<Option<VersionInfo>>;

    /// The published version of a project, most recent first if several exist
    async fn version_find_latest_published(
        &self,
        project_id: &str,
    ) -> anyhow::Result<Option<VersionInfo>>;

    /// Delete a version, returning the removed record
    async fn version_delete(&self, id: i64) -> anyhow::Result<Option<VersionInfo>>;

    /// Number of versions, across all projects, bound to a file URL either as
    /// artifact or as release notes
    async fn version_count_by_file_url(&self, url: &str) -> anyhow::Result<u64>;
}

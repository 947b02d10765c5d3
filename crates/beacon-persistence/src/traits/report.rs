//! Report persistence trait

use async_trait::async_trait;

use crate::model::{NewReport, Page, ReportInfo};

/// Report persistence operations
#[async_trait]
pub trait ReportPersistence: Send + Sync {
    /// Store a new report
    async fn report_create(&self, report: NewReport) -> anyhow::Result<ReportInfo>;

    /// Get a report by its ID
    async fn report_find_by_id(&self, id: i64) -> anyhow::Result<Option<ReportInfo>>;

    /// Delete a report, returns false when it did not exist
    async fn report_delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Most recent report of every non-empty username in a project.
    ///
    /// Ordered by report time descending; equal times are ordered by the
    /// greater id first, which also decides which row represents a user.
    /// `total_count` is the number of distinct usernames.
    async fn report_latest_per_user(
        &self,
        project_id: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ReportInfo>>;

    /// All reports of one username in a project, newest first
    async fn report_user_history(
        &self,
        project_id: &str,
        username: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<ReportInfo>>;
}

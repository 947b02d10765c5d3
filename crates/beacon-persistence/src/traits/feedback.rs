//! Feedback persistence trait

use async_trait::async_trait;

use crate::model::{FeedbackInfo, FeedbackStatus, NewFeedback, NewReply, Page};

/// Feedback persistence operations
#[async_trait]
pub trait FeedbackPersistence: Send + Sync {
    /// Store a new feedback thread in `pending` state
    async fn feedback_create(&self, feedback: NewFeedback) -> anyhow::Result<FeedbackInfo>;

    /// Get a feedback thread with its reply history
    async fn feedback_find_by_id(&self, id: i64) -> anyhow::Result<Option<FeedbackInfo>>;

    /// Feedback threads of a project, newest first
    async fn feedback_search_page(
        &self,
        project_id: &str,
        page_no: u64,
        page_size: u64,
    ) -> anyhow::Result<Page<FeedbackInfo>>;

    /// Set the status and/or add a reply in one transaction
    async fn feedback_update(
        &self,
        id: i64,
        status: Option<FeedbackStatus>,
        reply: Option<NewReply>,
    ) -> anyhow::Result<Option<FeedbackInfo>>;

    /// Delete a feedback thread and its replies
    async fn feedback_delete(&self, id: i64) -> anyhow::Result<bool>;
}

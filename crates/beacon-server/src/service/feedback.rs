//! Feedback threads

use std::str::FromStr;
use std::sync::Arc;

use beacon_common::{
    BeaconError, DEFAULT_FEEDBACK_PAGE_SIZE, optional_trimmed, page_window, required, utils,
};
use beacon_persistence::{
    FeedbackInfo, FeedbackStatus, NewFeedback, NewReply, Page, PersistenceService,
};
use chrono::Utc;
use serde::Deserialize;

/// Body of a feedback submission
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub project_id: Option<String>,
    pub username: Option<String>,
    pub content: Option<String>,
    pub email: Option<String>,
    pub ip: Option<String>,
}

/// Body of a status/reply update
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpdate {
    pub status: Option<String>,
    #[serde(alias = "reply")]
    pub reply_input: Option<String>,
}

pub struct FeedbackService {
    persistence: Arc<dyn PersistenceService>,
}

impl FeedbackService {
    pub fn new(persistence: Arc<dyn PersistenceService>) -> Self {
        Self { persistence }
    }

    pub async fn submit(
        &self,
        submission: FeedbackSubmission,
        peer_ip: Option<&str>,
    ) -> anyhow::Result<FeedbackInfo> {
        let project_id = utils::project_id(submission.project_id.as_deref())?;
        let username = required("username", submission.username.as_deref())?;
        let content = required("content", submission.content.as_deref())?;
        let ip = optional_trimmed(submission.ip.as_deref())
            .or_else(|| optional_trimmed(peer_ip))
            .unwrap_or_default();

        let feedback = self
            .persistence
            .feedback_create(NewFeedback {
                project_id,
                username,
                email: optional_trimmed(submission.email.as_deref()),
                content,
                ip,
            })
            .await?;

        tracing::info!(
            project_id = %feedback.project_id,
            feedback_id = feedback.id,
            "Feedback submitted"
        );

        Ok(feedback)
    }

    /// Feedback of a project, newest first
    pub async fn list(
        &self,
        project_id: Option<&str>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> anyhow::Result<Page<FeedbackInfo>> {
        let project_id = utils::project_id(project_id)?;
        let (page, page_size) = page_window(page, page_size, DEFAULT_FEEDBACK_PAGE_SIZE)?;

        self.persistence
            .feedback_search_page(&project_id, page, page_size)
            .await
    }

    pub async fn find(&self, id: i64) -> anyhow::Result<FeedbackInfo> {
        self.persistence
            .feedback_find_by_id(id)
            .await?
            .ok_or_else(|| BeaconError::NotFound(format!("feedback {}", id)).into())
    }

    /// Set the status and/or prepend a reply authored by `actor`.
    ///
    /// A reply that is blank after trimming is ignored; at least one of the
    /// two changes has to remain.
    pub async fn update_status_and_reply(
        &self,
        id: i64,
        update: FeedbackUpdate,
        actor: &str,
    ) -> anyhow::Result<FeedbackInfo> {
        let status = match optional_trimmed(update.status.as_deref()) {
            Some(status) => Some(FeedbackStatus::from_str(&status).map_err(BeaconError::Validation)?),
            None => None,
        };
        let reply = optional_trimmed(update.reply_input.as_deref()).map(|content| NewReply {
            content,
            admin: actor.to_string(),
            time: Utc::now(),
        });

        if status.is_none() && reply.is_none() {
            return Err(
                BeaconError::Validation("status or replyInput is required".to_string()).into(),
            );
        }

        let replied = reply.is_some();
        let feedback = self
            .persistence
            .feedback_update(id, status, reply)
            .await?
            .ok_or_else(|| BeaconError::NotFound(format!("feedback {}", id)))?;

        tracing::info!(
            project_id = %feedback.project_id,
            feedback_id = id,
            status = %feedback.status,
            replied,
            actor = %actor,
            "Feedback updated"
        );

        Ok(feedback)
    }

    pub async fn delete(&self, id: i64, actor: &str) -> anyhow::Result<()> {
        if !self.persistence.feedback_delete(id).await? {
            return Err(BeaconError::NotFound(format!("feedback {}", id)).into());
        }

        tracing::info!(feedback_id = id, actor = %actor, "Feedback deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_accepts_reply_alias() {
        let update: FeedbackUpdate =
            serde_json::from_str(r#"{"status":"resolved","reply":"thanks"}"#).unwrap();
        assert_eq!(update.status.as_deref(), Some("resolved"));
        assert_eq!(update.reply_input.as_deref(), Some("thanks"));
    }
}

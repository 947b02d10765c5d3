//! Report ingestion and dashboard queries

use std::sync::Arc;

use beacon_common::{
    BeaconError, DEFAULT_AGGREGATE_PAGE_SIZE, DEFAULT_HISTORY_PAGE_SIZE, optional_trimmed,
    page_window, required, utils,
};
use beacon_persistence::{NewReport, Page, PersistenceService, ReportInfo};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Client-supplied report time: RFC 3339 text or epoch milliseconds
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReportTime {
    Rfc3339(DateTime<Utc>),
    EpochMillis(i64),
}

impl ReportTime {
    fn to_utc(&self) -> Result<DateTime<Utc>, BeaconError> {
        match self {
            ReportTime::Rfc3339(time) => Ok(*time),
            ReportTime::EpochMillis(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .ok_or_else(|| BeaconError::Validation(format!("invalid timestamp {}", millis))),
        }
    }
}

/// Body of a report submission
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub project_id: Option<String>,
    pub username: Option<String>,
    pub ip: Option<String>,
    pub timestamp: Option<ReportTime>,
    pub version: Option<String>,
    pub remark: Option<String>,
    pub device_info: Option<String>,
    pub user_agent: Option<String>,
    pub location: Option<String>,
    pub additional_data: Option<serde_json::Value>,
}

pub struct ReportService {
    persistence: Arc<dyn PersistenceService>,
}

fn trimmed(value: &Option<String>) -> String {
    optional_trimmed(value.as_deref()).unwrap_or_default()
}

impl ReportService {
    pub fn new(persistence: Arc<dyn PersistenceService>) -> Self {
        Self { persistence }
    }

    /// Store one report. `peer_ip` fills in a missing `ip`.
    pub async fn submit(
        &self,
        submission: ReportSubmission,
        peer_ip: Option<&str>,
    ) -> anyhow::Result<ReportInfo> {
        let project_id = utils::project_id(submission.project_id.as_deref())?;
        let timestamp = match &submission.timestamp {
            Some(time) => time.to_utc()?,
            None => Utc::now(),
        };
        let ip = optional_trimmed(submission.ip.as_deref())
            .or_else(|| optional_trimmed(peer_ip))
            .unwrap_or_default();

        let report = self
            .persistence
            .report_create(NewReport {
                project_id,
                username: trimmed(&submission.username),
                ip,
                timestamp,
                version: trimmed(&submission.version),
                remark: trimmed(&submission.remark),
                device_info: trimmed(&submission.device_info),
                user_agent: trimmed(&submission.user_agent),
                location: trimmed(&submission.location),
                additional_data: submission.additional_data,
            })
            .await?;

        tracing::debug!(
            project_id = %report.project_id,
            report_id = report.id,
            username = %report.username,
            "Report stored"
        );

        Ok(report)
    }

    /// Most recent report of every user, newest first
    pub async fn latest_per_user(
        &self,
        project_id: Option<&str>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> anyhow::Result<Page<ReportInfo>> {
        let project_id = utils::project_id(project_id)?;
        let (page, page_size) = page_window(page, page_size, DEFAULT_AGGREGATE_PAGE_SIZE)?;

        self.persistence
            .report_latest_per_user(&project_id, page, page_size)
            .await
    }

    /// All reports of one user, newest first
    pub async fn user_history(
        &self,
        project_id: Option<&str>,
        username: &str,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> anyhow::Result<Page<ReportInfo>> {
        let project_id = utils::project_id(project_id)?;
        let username = required("username", Some(username))?;
        let (page, page_size) = page_window(page, page_size, DEFAULT_HISTORY_PAGE_SIZE)?;

        self.persistence
            .report_user_history(&project_id, &username, page, page_size)
            .await
    }

    pub async fn find(&self, id: i64) -> anyhow::Result<ReportInfo> {
        self.persistence
            .report_find_by_id(id)
            .await?
            .ok_or_else(|| BeaconError::NotFound(format!("report {}", id)).into())
    }

    pub async fn delete(&self, id: i64, actor: &str) -> anyhow::Result<()> {
        if !self.persistence.report_delete(id).await? {
            return Err(BeaconError::NotFound(format!("report {}", id)).into());
        }

        tracing::info!(report_id = id, actor = %actor, "Report deleted");

        Ok(())
    }
}

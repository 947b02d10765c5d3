//! Domain model types for the persistence abstraction layer
//!
//! These types are used as arguments and return values of the persistence
//! traits, decoupled from the SeaORM entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic paginated result
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                total_count.div_ceil(page_size)
            } else {
                0
            },
            page_items,
        }
    }
}

/// Row offset of a 1-based page, saturating at the largest offset the
/// database accepts
pub(crate) fn page_offset(page_number: u64, page_size: u64) -> u64 {
    page_number
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(i64::MAX as u64)
}

/// Lifecycle state of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Draft,
    Published,
    Deprecated,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::Published => "published",
            VersionStatus::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(VersionStatus::Draft),
            "published" => Ok(VersionStatus::Published),
            "deprecated" => Ok(VersionStatus::Deprecated),
            _ => Err(format!("Invalid version status: {}", s)),
        }
    }
}

/// How clients are asked to apply a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Force,
    Active,
    #[default]
    Passive,
}

impl UpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateType::Force => "force",
            UpdateType::Active => "active",
            UpdateType::Passive => "passive",
        }
    }
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UpdateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force" => Ok(UpdateType::Force),
            "active" => Ok(UpdateType::Active),
            "passive" => Ok(UpdateType::Passive),
            _ => Err(format!("Invalid update type: {}", s)),
        }
    }
}

/// Review state of a feedback thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Reviewed => "reviewed",
            FeedbackStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeedbackStatus::Pending),
            "reviewed" => Ok(FeedbackStatus::Reviewed),
            "resolved" => Ok(FeedbackStatus::Resolved),
            _ => Err(format!("Invalid feedback status: {}", s)),
        }
    }
}

/// A stored report. Also the row shape of the latest-per-user view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub id: i64,
    pub project_id: String,
    pub username: String,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub remark: String,
    pub device_info: String,
    pub user_agent: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<serde_json::Value>,
}

/// Fields of a report about to be stored
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewReport {
    pub project_id: String,
    pub username: String,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub remark: String,
    pub device_info: String,
    pub user_agent: String,
    pub location: String,
    pub additional_data: Option<serde_json::Value>,
}

/// One entry of a feedback reply history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReply {
    pub content: String,
    pub time: DateTime<Utc>,
    pub admin: String,
}

/// A feedback thread with its reply history, newest reply first
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInfo {
    pub id: i64,
    pub project_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub content: String,
    pub ip: String,
    pub timestamp: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: FeedbackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_input: Option<String>,
    pub reply_history: Vec<FeedbackReply>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewFeedback {
    pub project_id: String,
    pub username: String,
    pub email: Option<String>,
    pub content: String,
    pub ip: String,
}

/// Reply appended by a status/reply update
#[derive(Clone, Debug, PartialEq)]
pub struct NewReply {
    pub content: String,
    pub admin: String,
    pub time: DateTime<Utc>,
}

/// A release record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: i64,
    pub project_id: String,
    pub version_number: String,
    pub description: String,
    pub status: VersionStatus,
    pub update_type: UpdateType,
    pub download_url: Option<String>,
    pub original_file_name: Option<String>,
    pub file_ext: Option<String>,
    pub file_size: Option<u64>,
    pub description_file_url: Option<String>,
    pub description_file_name: Option<String>,
    pub published_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields of a draft version about to be stored
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewVersion {
    pub project_id: String,
    pub version_number: String,
    pub description: String,
    pub update_type: UpdateType,
    pub download_url: Option<String>,
    pub original_file_name: Option<String>,
    pub file_ext: Option<String>,
    pub file_size: Option<u64>,
    pub description_file_url: Option<String>,
    pub description_file_name: Option<String>,
    pub published_by: String,
}

/// Partial update of a version; `None` leaves a field untouched
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionChanges {
    pub status: Option<VersionStatus>,
    pub update_type: Option<UpdateType>,
    pub version_number: Option<String>,
    pub description: Option<String>,
}

impl VersionChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.update_type.is_none()
            && self.version_number.is_none()
            && self.description.is_none()
    }
}

//! Inputs of the version lifecycle

use beacon_persistence::UpdateType;
use bytes::Bytes;

use crate::artifact::{RenameStrategy, StoredArtifact};

/// Text fields of a publish request as received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishRequest {
    pub project_id: Option<String>,
    pub version_number: Option<String>,
    pub description: Option<String>,
    pub update_type: UpdateType,
    pub published_by: String,
}

/// Files already written to the store for a pending publish
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedUploads {
    pub artifact: Option<StoredArtifact>,
    pub notes: Option<StoredArtifact>,
}

impl StagedUploads {
    pub fn files(&self) -> impl Iterator<Item = &StoredArtifact> {
        self.artifact.iter().chain(self.notes.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.artifact.is_none() && self.notes.is_none()
    }
}

/// Final naming of staged files, applied once the draft is accepted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileNaming {
    pub strategy: RenameStrategy,
    /// Client-side name of the main artifact, replacing the uploaded one
    pub original_file_name: Option<String>,
}

/// An upload held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: &str, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content: content.into(),
        }
    }
}

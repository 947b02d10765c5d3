//! Beacon Release - Version lifecycle and artifact files
//!
//! This crate provides:
//! - `ArtifactStore`: streamed uploads into a flat content directory
//! - `repair_encoding`: best-effort fix of mis-decoded upload file names
//! - `VersionService`: publish, promote, update and delete of versions

pub mod artifact;
pub mod filename;
pub mod model;
pub mod version;

pub use artifact::{ArtifactStore, RenameStrategy, StoredArtifact};
pub use filename::{repair_encoding, sanitize_file_name};
pub use model::{FileNaming, PublishRequest, StagedUploads, UploadedFile};
pub use version::VersionService;

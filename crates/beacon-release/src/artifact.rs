//! Artifact file store
//!
//! Uploaded files live in one flat directory and are addressed by their
//! stored name. Uploads are streamed into a hidden temporary file that is
//! renamed into place only once the whole body has been received, so a
//! stored name never points at a partial file.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use beacon_common::BeaconError;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::filename::{file_ext, repair_encoding, sanitize_file_name};

const TEMP_PREFIX: &str = ".upload-";

/// How the stored name of an upload is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameStrategy {
    /// Keep the uploaded file name. A later upload with the same name
    /// replaces the file (last write wins).
    PreserveName,
    /// Use a random unique name with the original extension
    #[default]
    HashRename,
}

impl RenameStrategy {
    pub fn from_enable_rename(enable_rename: bool) -> Self {
        if enable_rename {
            RenameStrategy::HashRename
        } else {
            RenameStrategy::PreserveName
        }
    }
}

/// Metadata of a file written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub stored_name: String,
    /// Uploaded name after encoding repair
    pub original_name: String,
    pub file_ext: Option<String>,
    pub size_bytes: u64,
    pub download_url: String,
}

/// Removes the temporary file unless the upload completed
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial upload")
            }
        }
    }
}

/// Flat directory of uploaded artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    url_prefix: String,
    max_file_size: u64,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str, max_file_size: u64) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    /// Create the content directory if needed
    pub async fn init(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            BeaconError::Storage(format!(
                "cannot create artifact dir {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn download_url(&self, stored_name: &str) -> String {
        format!("{}/{}", self.url_prefix, stored_name)
    }

    /// Stored name referenced by a download URL of this store
    pub fn stored_name_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')
            .filter(|name| Self::is_stored_name(name))
    }

    fn is_stored_name(name: &str) -> bool {
        sanitize_file_name(name).as_deref() == Some(name)
    }

    fn stored_name_for(original_name: &str, strategy: RenameStrategy) -> String {
        let hashed = || {
            let ext = file_ext(original_name).unwrap_or_default();
            format!("{}{}", uuid::Uuid::new_v4().simple(), ext)
        };

        match strategy {
            RenameStrategy::PreserveName => sanitize_file_name(original_name).unwrap_or_else(hashed),
            RenameStrategy::HashRename => hashed(),
        }
    }

    /// Store an in-memory payload
    pub async fn store(
        &self,
        bytes: Bytes,
        original_name: &str,
        strategy: RenameStrategy,
    ) -> anyhow::Result<StoredArtifact> {
        let stream = futures::stream::iter([Ok::<_, std::convert::Infallible>(bytes)]);
        self.store_stream(stream, original_name, strategy).await
    }

    /// Stream an upload into the store.
    ///
    /// Fails with `PayloadTooLarge` once more than `max_file_size` bytes
    /// arrive and with `Validation` when the body stream breaks off. In
    /// both cases, and when the future is dropped early, nothing is left
    /// in the content directory.
    pub async fn store_stream<S, E>(
        &self,
        mut stream: S,
        original_name: &str,
        strategy: RenameStrategy,
    ) -> anyhow::Result<StoredArtifact>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let original_name = repair_encoding(original_name);
        let stored_name = Self::stored_name_for(&original_name, strategy);

        let temp_path = self
            .dir
            .join(format!("{}{}", TEMP_PREFIX, uuid::Uuid::new_v4().simple()));
        let mut temp = TempFile::new(temp_path.clone());

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| BeaconError::Storage(format!("cannot create upload file: {}", e)))?;

        let mut size_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| BeaconError::Validation(format!("upload interrupted: {}", e)))?;

            size_bytes += chunk.len() as u64;
            if size_bytes > self.max_file_size {
                return Err(BeaconError::PayloadTooLarge(format!(
                    "file '{}' exceeds {} bytes",
                    original_name, self.max_file_size
                ))
                .into());
            }

            file.write_all(&chunk)
                .await
                .map_err(|e| BeaconError::Storage(format!("cannot write upload file: {}", e)))?;
        }

        file.flush()
            .await
            .map_err(|e| BeaconError::Storage(format!("cannot flush upload file: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| BeaconError::Storage(format!("cannot flush upload file: {}", e)))?;
        drop(file);

        tokio::fs::rename(&temp_path, self.dir.join(&stored_name))
            .await
            .map_err(|e| BeaconError::Storage(format!("cannot move upload into place: {}", e)))?;
        temp.disarm();

        tracing::info!(
            stored_name = %stored_name,
            original_name = %original_name,
            size_bytes,
            "Artifact stored"
        );

        Ok(StoredArtifact {
            download_url: self.download_url(&stored_name),
            file_ext: file_ext(&original_name),
            stored_name,
            original_name,
            size_bytes,
        })
    }

    /// Give a staged upload its final name.
    ///
    /// Multipart bodies may carry the rename choice and the client-side file
    /// name after the file itself, so uploads are staged under a random name
    /// and renamed here. A non-blank `original_name` replaces the recorded one.
    pub async fn finalize(
        &self,
        mut artifact: StoredArtifact,
        original_name: Option<&str>,
        strategy: RenameStrategy,
    ) -> anyhow::Result<StoredArtifact> {
        if let Some(name) = original_name.map(str::trim).filter(|n| !n.is_empty()) {
            artifact.original_name = repair_encoding(name);
            artifact.file_ext = file_ext(&artifact.original_name);
        }

        if strategy == RenameStrategy::HashRename {
            return Ok(artifact);
        }

        let Some(target) = sanitize_file_name(&artifact.original_name) else {
            return Ok(artifact);
        };
        if target == artifact.stored_name {
            return Ok(artifact);
        }

        tokio::fs::rename(self.dir.join(&artifact.stored_name), self.dir.join(&target))
            .await
            .map_err(|e| BeaconError::Storage(format!("cannot rename upload: {}", e)))?;

        tracing::debug!(from = %artifact.stored_name, to = %target, "Artifact renamed");

        artifact.download_url = self.download_url(&target);
        artifact.stored_name = target;

        Ok(artifact)
    }

    /// Remove a stored file. Missing files are not an error.
    pub async fn delete(&self, stored_name: &str) -> anyhow::Result<bool> {
        if !Self::is_stored_name(stored_name) {
            return Ok(false);
        }

        match tokio::fs::remove_file(self.dir.join(stored_name)).await {
            Ok(()) => {
                tracing::info!(stored_name = %stored_name, "Artifact deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BeaconError::Storage(format!(
                "cannot delete artifact '{}': {}",
                stored_name, e
            ))
            .into()),
        }
    }

    /// Path of an existing stored file
    pub async fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        if !Self::is_stored_name(stored_name) {
            return None;
        }

        let path = self.dir.join(stored_name);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Some(path),
            _ => None,
        }
    }
}

//! Version lifecycle
//!
//! Publishing creates a draft bound to the uploaded files. Promoting marks
//! one version of a project as published and deprecates the previously
//! published one. Promotions of one project are serialized in process and
//! each runs as a single database transaction.

use std::sync::Arc;

use beacon_common::{BeaconError, required, utils};
use beacon_persistence::{
    NewVersion, PersistenceService, VersionChanges, VersionInfo, VersionStatus,
};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::artifact::{ArtifactStore, RenameStrategy, StoredArtifact};
use crate::model::{FileNaming, PublishRequest, StagedUploads, UploadedFile};

pub struct VersionService {
    persistence: Arc<dyn PersistenceService>,
    store: Arc<ArtifactStore>,
    promote_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl VersionService {
    pub fn new(persistence: Arc<dyn PersistenceService>, store: Arc<ArtifactStore>) -> Self {
        Self {
            persistence,
            store,
            promote_locks: DashMap::new(),
        }
    }

    /// Projects with a promotion in flight
    pub fn promotions_in_flight(&self) -> usize {
        self.promote_locks.len()
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Remove staged files after a failed publish. A file that another
    /// version still points to is kept.
    pub async fn discard(&self, staged: &StagedUploads) {
        for file in staged.files() {
            self.release_file(&file.download_url).await;
        }
    }

    /// Store the files, then create the draft
    pub async fn publish(
        &self,
        request: PublishRequest,
        artifact: Option<UploadedFile>,
        notes: Option<UploadedFile>,
        strategy: RenameStrategy,
    ) -> anyhow::Result<VersionInfo> {
        let mut staged = StagedUploads::default();

        if let Some(upload) = artifact {
            staged.artifact = Some(self.stage(upload, &staged).await?);
        }
        if let Some(upload) = notes {
            staged.notes = Some(self.stage(upload, &staged).await?);
        }

        let naming = FileNaming {
            strategy,
            original_file_name: None,
        };
        self.publish_staged(request, staged, &naming).await
    }

    async fn stage(
        &self,
        upload: UploadedFile,
        staged: &StagedUploads,
    ) -> anyhow::Result<StoredArtifact> {
        match self
            .store
            .store(upload.content, &upload.file_name, RenameStrategy::HashRename)
            .await
        {
            Ok(stored) => Ok(stored),
            Err(e) => {
                self.discard(staged).await;
                Err(e)
            }
        }
    }

    /// Create a draft for files staged under random names.
    ///
    /// The request is checked before any file takes its final name, so a
    /// rejected publish never replaces a file of an existing version. On any
    /// failure the staged files are deleted before the error is returned.
    pub async fn publish_staged(
        &self,
        request: PublishRequest,
        mut staged: StagedUploads,
        naming: &FileNaming,
    ) -> anyhow::Result<VersionInfo> {
        let draft = match self.check_draft(request).await {
            Ok(draft) => draft,
            Err(e) => {
                self.discard(&staged).await;
                return Err(e);
            }
        };

        if let Err(e) = self.name_files(&mut staged, naming).await {
            self.discard(&staged).await;
            return Err(e);
        }

        match self.create_draft(draft, &staged).await {
            Ok(version) => Ok(version),
            Err(e) => {
                self.discard(&staged).await;
                Err(e)
            }
        }
    }

    async fn check_draft(&self, request: PublishRequest) -> anyhow::Result<NewVersion> {
        let project_id = utils::project_id(request.project_id.as_deref())?;
        let version_number = required("versionNumber", request.version_number.as_deref())?;
        let description = required("description", request.description.as_deref())?;
        let published_by = required("publishedBy", Some(request.published_by.as_str()))?;

        if self
            .persistence
            .version_number_exists(&project_id, &version_number, None)
            .await?
        {
            return Err(BeaconError::Conflict(format!(
                "versionNumber '{}' already exists",
                version_number
            ))
            .into());
        }

        Ok(NewVersion {
            project_id,
            version_number,
            description,
            update_type: request.update_type,
            published_by,
            ..Default::default()
        })
    }

    /// Move staged files to their final names. `staged` always reflects
    /// where the files currently are.
    async fn name_files(
        &self,
        staged: &mut StagedUploads,
        naming: &FileNaming,
    ) -> anyhow::Result<()> {
        if let Some(artifact) = staged.artifact.clone() {
            let artifact = self
                .store
                .finalize(artifact, naming.original_file_name.as_deref(), naming.strategy)
                .await?;
            staged.artifact = Some(artifact);
        }
        if let Some(notes) = staged.notes.clone() {
            let notes = self.store.finalize(notes, None, naming.strategy).await?;
            staged.notes = Some(notes);
        }
        Ok(())
    }

    async fn create_draft(
        &self,
        mut draft: NewVersion,
        staged: &StagedUploads,
    ) -> anyhow::Result<VersionInfo> {
        if let Some(artifact) = staged.artifact.as_ref() {
            draft.download_url = Some(artifact.download_url.clone());
            draft.original_file_name = Some(artifact.original_name.clone());
            draft.file_ext = artifact.file_ext.clone();
            draft.file_size = Some(artifact.size_bytes);
        }
        if let Some(notes) = staged.notes.as_ref() {
            draft.description_file_url = Some(notes.download_url.clone());
            draft.description_file_name = Some(notes.original_name.clone());
        }

        let version = self.persistence.version_create(draft).await?;

        tracing::info!(
            project_id = %version.project_id,
            version_id = version.id,
            version_number = %version.version_number,
            actor = %version.published_by,
            "Version published as draft"
        );

        Ok(version)
    }

    pub async fn find(&self, id: i64) -> anyhow::Result<VersionInfo> {
        self.persistence
            .version_find_by_id(id)
            .await?
            .ok_or_else(|| BeaconError::NotFound(format!("version {}", id)).into())
    }

    pub async fn list(&self, project_id: Option<&str>) -> anyhow::Result<Vec<VersionInfo>> {
        let project_id = utils::project_id(project_id)?;
        self.persistence.version_find_by_project(&project_id).await
    }

    /// The published version of a project
    pub async fn latest(&self, project_id: Option<&str>) -> anyhow::Result<VersionInfo> {
        let project_id = utils::project_id(project_id)?;
        self.persistence
            .version_find_latest_published(&project_id)
            .await?
            .ok_or_else(|| {
                BeaconError::NotFound(format!("published version of project {}", project_id))
                    .into()
            })
    }

    /// Mark a version as the published one of its project
    pub async fn promote(&self, id: i64) -> anyhow::Result<VersionInfo> {
        let target = self.find(id).await?;

        let lock = self
            .promote_locks
            .entry(target.project_id.clone())
            .or_default()
            .clone();
        let guard = lock.lock().await;
        let promoted = self.persistence.version_promote(id).await;
        drop(guard);
        drop(lock);

        // The entry lives only while some promotion holds or waits on it
        self.promote_locks
            .remove_if(&target.project_id, |_, lock| Arc::strong_count(lock) == 1);

        let promoted =
            promoted?.ok_or_else(|| BeaconError::NotFound(format!("version {}", id)))?;

        tracing::info!(
            project_id = %promoted.project_id,
            version_id = promoted.id,
            "Version promoted to published"
        );

        Ok(promoted)
    }

    /// Apply a partial update. A change to `published` goes through `promote`.
    pub async fn update(&self, id: i64, mut changes: VersionChanges) -> anyhow::Result<VersionInfo> {
        let current = self.find(id).await?;

        if let Some(number) = changes.version_number.take() {
            let number = required("versionNumber", Some(number.as_str()))?;
            if number != current.version_number
                && self
                    .persistence
                    .version_number_exists(&current.project_id, &number, Some(id))
                    .await?
            {
                return Err(BeaconError::Conflict(format!(
                    "versionNumber '{}' already exists",
                    number
                ))
                .into());
            }
            changes.version_number = Some(number);
        }

        if let Some(description) = changes.description.take() {
            changes.description = Some(required("description", Some(description.as_str()))?);
        }

        let promote = changes.status == Some(VersionStatus::Published);
        if promote {
            changes.status = None;
        }

        let mut updated = current;
        if !changes.is_empty() {
            updated = self
                .persistence
                .version_update(id, changes)
                .await?
                .ok_or_else(|| BeaconError::NotFound(format!("version {}", id)))?;
        }

        if promote {
            updated = self.promote(id).await?;
        }

        tracing::info!(
            project_id = %updated.project_id,
            version_id = id,
            status = %updated.status,
            "Version updated"
        );

        Ok(updated)
    }

    /// Delete the record, then its files when nothing else references them
    pub async fn delete(&self, id: i64) -> anyhow::Result<VersionInfo> {
        let deleted = self
            .persistence
            .version_delete(id)
            .await?
            .ok_or_else(|| BeaconError::NotFound(format!("version {}", id)))?;

        let urls = [
            deleted.download_url.as_deref(),
            deleted.description_file_url.as_deref(),
        ];
        for url in urls.into_iter().flatten() {
            self.release_file(url).await;
        }

        tracing::info!(
            project_id = %deleted.project_id,
            version_id = id,
            "Version deleted"
        );

        Ok(deleted)
    }

    async fn release_file(&self, url: &str) {
        let Some(stored_name) = self.store.stored_name_from_url(url) else {
            tracing::warn!(url = %url, "Version file is not in the artifact store");
            return;
        };

        match self.persistence.version_count_by_file_url(url).await {
            Ok(0) => {}
            Ok(count) => {
                tracing::info!(
                    stored_name = %stored_name,
                    references = count,
                    "Artifact still referenced, keeping file"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(stored_name = %stored_name, error = %e, "Cannot count artifact references");
                return;
            }
        }

        if let Err(e) = self.store.delete(stored_name).await {
            tracing::warn!(stored_name = %stored_name, error = %e, "Failed to delete artifact");
        }
    }
}

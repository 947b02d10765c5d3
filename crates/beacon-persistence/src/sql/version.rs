//! Version records and the single-published transition

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{prelude::Expr, *};

use super::{ExternalDbPersistService, conflict_on_unique};
use crate::entity::version;
use crate::model::{NewVersion, VersionChanges, VersionInfo, VersionStatus};
use crate::traits::VersionPersistence;

fn version_to_info(model: version::Model) -> VersionInfo {
    VersionInfo {
        id: model.id,
        project_id: model.project_id,
        version_number: model.version_number,
        description: model.description,
        status: model.status.parse().unwrap_or_default(),
        update_type: model.update_type.parse().unwrap_or_default(),
        download_url: model.download_url,
        original_file_name: model.original_file_name,
        file_ext: model.file_ext,
        file_size: model.file_size.map(|size| size.max(0) as u64),
        description_file_url: model.description_file_url,
        description_file_name: model.description_file_name,
        published_by: model.published_by,
        timestamp: model.created_at.and_utc(),
    }
}

#[async_trait]
impl VersionPersistence for ExternalDbPersistService {
    async fn version_create(&self, version: NewVersion) -> anyhow::Result<VersionInfo> {
        let now = Utc::now().naive_utc();
        let version_number = version.version_number.clone();

        let entity = version::ActiveModel {
            project_id: Set(version.project_id),
            version_number: Set(version.version_number),
            description: Set(version.description),
            status: Set(VersionStatus::Draft.as_str().to_string()),
            update_type: Set(version.update_type.as_str().to_string()),
            download_url: Set(version.download_url),
            original_file_name: Set(version.original_file_name),
            file_ext: Set(version.file_ext),
            file_size: Set(version.file_size.map(|size| size as i64)),
            description_file_url: Set(version.description_file_url),
            description_file_name: Set(version.description_file_name),
            published_by: Set(version.published_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = entity.insert(&self.db).await.map_err(|e| {
            conflict_on_unique(e, || {
                format!("versionNumber '{}' already exists", version_number)
            })
        })?;

        Ok(version_to_info(model))
    }

    async fn version_find_by_id(&self, id: i64) -> anyhow::Result<Option<VersionInfo>> {
        Ok(version::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(version_to_info))
    }

    async fn version_find_by_project(
        &self,
        project_id: &str,
    ) -> anyhow::Result<Vec<VersionInfo>> {
        Ok(version::Entity::find()
            .filter(version::Column::ProjectId.eq(project_id))
            .order_by_desc(version::Column::CreatedAt)
            .order_by_desc(version::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(version_to_info)
            .collect())
    }

    async fn version_number_exists(
        &self,
        project_id: &str,
        version_number: &str,
        exclude_id: Option<i64>,
    ) -> anyhow::Result<bool> {
        let mut query = version::Entity::find()
            .filter(version::Column::ProjectId.eq(project_id))
            .filter(version::Column::VersionNumber.eq(version_number));

        if let Some(id) = exclude_id {
            query = query.filter(version::Column::Id.ne(id));
        }

        Ok(query.count(&self.db).await? > 0)
    }

    async fn version_update(
        &self,
        id: i64,
        changes: VersionChanges,
    ) -> anyhow::Result<Option<VersionInfo>> {
        let Some(model) = version::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut entity: version::ActiveModel = model.into();
        entity.updated_at = Set(Utc::now().naive_utc());

        if let Some(status) = changes.status {
            entity.status = Set(status.as_str().to_string());
        }
        if let Some(update_type) = changes.update_type {
            entity.update_type = Set(update_type.as_str().to_string());
        }
        if let Some(description) = changes.description {
            entity.description = Set(description);
        }
        let version_number = changes.version_number.clone();
        if let Some(version_number) = changes.version_number {
            entity.version_number = Set(version_number);
        }

        let model = entity.update(&self.db).await.map_err(|e| {
            conflict_on_unique(e, || {
                format!(
                    "versionNumber '{}' already exists",
                    version_number.unwrap_or_default()
                )
            })
        })?;

        Ok(Some(version_to_info(model)))
    }

    async fn version_promote(&self, id: i64) -> anyhow::Result<Option<VersionInfo>> {
        let tx = self.db.begin().await?;

        let Some(target) = version::Entity::find_by_id(id).one(&tx).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();

        let demoted = version::Entity::update_many()
            .col_expr(
                version::Column::Status,
                Expr::value(VersionStatus::Deprecated.as_str()),
            )
            .col_expr(version::Column::UpdatedAt, Expr::value(now))
            .filter(version::Column::ProjectId.eq(target.project_id.as_str()))
            .filter(version::Column::Status.eq(VersionStatus::Published.as_str()))
            .filter(version::Column::Id.ne(id))
            .exec(&tx)
            .await?;

        let mut entity: version::ActiveModel = target.into();
        entity.status = Set(VersionStatus::Published.as_str().to_string());
        entity.updated_at = Set(now);
        let model = entity.update(&tx).await?;

        tx.commit().await?;

        tracing::debug!(
            version_id = id,
            project_id = %model.project_id,
            demoted = demoted.rows_affected,
            "Version promoted"
        );

        Ok(Some(version_to_info(model)))
    }

    async fn version_find_latest_published(
        &self,
        project_id: &str,
    ) -> anyhow::Result<Option<VersionInfo>> {
        Ok(version::Entity::find()
            .filter(version::Column::ProjectId.eq(project_id))
            .filter(version::Column::Status.eq(VersionStatus::Published.as_str()))
            .order_by_desc(version::Column::CreatedAt)
            .order_by_desc(version::Column::Id)
            .one(&self.db)
            .await?
            .map(version_to_info))
    }

    async fn version_delete(&self, id: i64) -> anyhow::Result<Option<VersionInfo>> {
        let tx = self.db.begin().await?;

        let Some(model) = version::Entity::find_by_id(id).one(&tx).await? else {
            return Ok(None);
        };

        let result = version::Entity::delete_by_id(id).exec(&tx).await?;

        tx.commit().await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(version_to_info(model)))
    }

    async fn version_count_by_file_url(&self, url: &str) -> anyhow::Result<u64> {
        Ok(version::Entity::find()
            .filter(
                Condition::any()
                    .add(version::Column::DownloadUrl.eq(url))
                    .add(version::Column::DescriptionFileUrl.eq(url)),
            )
            .count(&self.db)
            .await?)
    }
}

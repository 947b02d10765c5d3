use std::str::FromStr;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use futures::StreamExt;
use serde::Deserialize;

use beacon_common::BeaconError;
use beacon_persistence::{UpdateType, VersionChanges};
use beacon_release::{ArtifactStore, FileNaming, PublishRequest, RenameStrategy, StagedUploads};

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
};

const FILE_FIELD: &str = "file";
const DESCRIPTION_FILE_FIELD: &str = "descriptionFile";
/// Upper bound for a single text part of the publish form
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectParam {
    project_id: Option<String>,
}

/// Text parts of a publish form
#[derive(Debug, Default)]
struct PublishForm {
    project_id: Option<String>,
    version_number: Option<String>,
    description: Option<String>,
    published_by: Option<String>,
    update_type: Option<String>,
    enable_rename: Option<String>,
    original_file_name: Option<String>,
}

impl PublishForm {
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "projectId" => &mut self.project_id,
            "versionNumber" => &mut self.version_number,
            "description" => &mut self.description,
            "publishedBy" => &mut self.published_by,
            "updateType" => &mut self.update_type,
            "enableRename" => &mut self.enable_rename,
            "originalFileName" => &mut self.original_file_name,
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown publish form field");
                return;
            }
        };
        *slot = Some(value);
    }

    fn rename_strategy(&self) -> RenameStrategy {
        let enabled = self
            .enable_rename
            .as_deref()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on"))
            .unwrap_or(false);
        RenameStrategy::from_enable_rename(enabled)
    }

    fn update_type(&self) -> std::result::Result<UpdateType, BeaconError> {
        match self.update_type.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => UpdateType::from_str(value).map_err(BeaconError::Validation),
            None => Ok(UpdateType::default()),
        }
    }
}

async fn read_text(field: &mut Field) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| BeaconError::Validation(format!("malformed multipart body: {}", e)))?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_SIZE {
            return Err(BeaconError::PayloadTooLarge(format!(
                "form field exceeds {} bytes",
                MAX_TEXT_FIELD_SIZE
            ))
            .into());
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf)
        .map_err(|_| BeaconError::Validation("form field is not valid UTF-8".to_string()).into())
}

async fn drain(field: &mut Field) -> anyhow::Result<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| BeaconError::Validation(format!("malformed multipart body: {}", e)))?;
    }
    Ok(())
}

/// Read the whole multipart body, staging file parts in the store as they
/// arrive. Everything staged is recorded in `staged`, also on failure.
async fn read_publish_form(
    payload: &mut Multipart,
    store: &ArtifactStore,
    staged: &mut StagedUploads,
) -> anyhow::Result<PublishForm> {
    let mut form = PublishForm::default();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| BeaconError::Validation(format!("malformed multipart body: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        match (name.as_str(), file_name) {
            (FILE_FIELD | DESCRIPTION_FILE_FIELD, Some(file_name)) => {
                if file_name.trim().is_empty() {
                    drain(&mut field).await?;
                    continue;
                }

                let slot = if name == FILE_FIELD {
                    &mut staged.artifact
                } else {
                    &mut staged.notes
                };
                if slot.is_some() {
                    return Err(BeaconError::Validation(format!(
                        "field '{}' given more than once",
                        name
                    ))
                    .into());
                }

                let stored = store
                    .store_stream(field, &file_name, RenameStrategy::HashRename)
                    .await?;
                *slot = Some(stored);
            }
            _ => {
                let value = read_text(&mut field).await?;
                form.set(&name, value);
            }
        }
    }

    Ok(form)
}

/// Build the publish request and the naming of the staged files
fn prepare(form: &PublishForm, actor: &str) -> anyhow::Result<(PublishRequest, FileNaming)> {
    let update_type = form.update_type()?;

    let published_by = form
        .published_by
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(actor)
        .to_string();

    let request = PublishRequest {
        project_id: form.project_id.clone(),
        version_number: form.version_number.clone(),
        description: form.description.clone(),
        update_type,
        published_by,
    };
    let naming = FileNaming {
        strategy: form.rename_strategy(),
        original_file_name: form.original_file_name.clone(),
    };

    Ok((request, naming))
}

#[post("/publish")]
async fn publish(
    req: HttpRequest,
    data: web::Data<AppState>,
    mut payload: Multipart,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);

    let service = &data.version_service;
    let mut staged = StagedUploads::default();

    let prepared = match read_publish_form(&mut payload, service.store(), &mut staged).await {
        Ok(form) => prepare(&form, &principal.username),
        Err(e) => Err(e),
    };
    let (request, naming) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            service.discard(&staged).await;
            return Err(e.into());
        }
    };

    let version = service.publish_staged(request, staged, &naming).await?;

    Ok(Result::http_created(version))
}

#[put("/{id}/promote")]
async fn promote(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);
    let id = path.into_inner();

    let version = data.version_service.promote(id).await?;
    tracing::info!(version_id = id, actor = %principal.username, "Version promoted via console");

    Ok(Result::http_success(version))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<VersionChanges>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);
    let id = path.into_inner();

    let version = data.version_service.update(id, body.into_inner()).await?;
    tracing::info!(version_id = id, actor = %principal.username, "Version updated via console");

    Ok(Result::http_success(version))
}

#[get("/latest")]
async fn latest(
    data: web::Data<AppState>,
    params: web::Query<ProjectParam>,
) -> actix_web::Result<HttpResponse, AppError> {
    let version = data
        .version_service
        .latest(params.project_id.as_deref())
        .await?;

    Ok(Result::http_success(version))
}

#[get("/latest/{project_id}")]
async fn latest_by_path(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse, AppError> {
    let project_id = path.into_inner();
    let version = data.version_service.latest(Some(&project_id)).await?;

    Ok(Result::http_success(version))
}

#[get("")]
async fn list(
    data: web::Data<AppState>,
    params: web::Query<ProjectParam>,
) -> actix_web::Result<HttpResponse, AppError> {
    let versions = data
        .version_service
        .list(params.project_id.as_deref())
        .await?;
    let total = versions.len() as u64;

    Ok(Result::http_page(versions, total))
}

#[get("/{id}")]
async fn find_one(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let version = data.version_service.find(path.into_inner()).await?;

    Ok(Result::http_success(version))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);
    let id = path.into_inner();

    let version = data.version_service.delete(id).await?;
    tracing::info!(version_id = id, actor = %principal.username, "Version deleted via console");

    Ok(Result::http_success(version))
}

pub fn routes() -> Scope {
    web::scope("/versions")
        .service(publish)
        .service(latest)
        .service(latest_by_path)
        .service(list)
        .service(promote)
        .service(update)
        .service(find_one)
        .service(remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_form_defaults() {
        let form = PublishForm::default();
        assert_eq!(form.rename_strategy(), RenameStrategy::PreserveName);
        assert_eq!(form.update_type().unwrap(), UpdateType::Passive);
    }

    #[test]
    fn test_publish_form_fields() {
        let mut form = PublishForm::default();
        form.set("enableRename", "true".to_string());
        form.set("updateType", "force".to_string());
        form.set("somethingElse", "x".to_string());
        assert_eq!(form.rename_strategy(), RenameStrategy::HashRename);
        assert_eq!(form.update_type().unwrap(), UpdateType::Force);

        form.set("updateType", "sometimes".to_string());
        assert!(matches!(form.update_type(), Err(BeaconError::Validation(_))));
    }
}

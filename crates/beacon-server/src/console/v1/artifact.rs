use actix_web::{HttpResponse, Scope, get, http::header, web};
use bytes::BytesMut;
use tokio::io::AsyncReadExt;

use beacon_common::BeaconError;

use crate::{error::AppError, model::AppState};

const CHUNK_SIZE: usize = 64 * 1024;

/// Stream a stored artifact
#[get("/{stored_name}")]
async fn download(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse, AppError> {
    let stored_name = path.into_inner();

    let Some(file_path) = data.artifact_store.resolve(&stored_name).await else {
        return Err(BeaconError::NotFound(format!("artifact '{}'", stored_name)).into());
    };

    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|e| BeaconError::Storage(format!("cannot open artifact: {}", e)))?;
    let length = file
        .metadata()
        .await
        .map_err(|e| BeaconError::Storage(format!("cannot read artifact metadata: {}", e)))?
        .len();

    let body = futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        let read = file.read_buf(&mut buf).await?;
        Ok::<_, std::io::Error>((read > 0).then(|| (buf.freeze(), file)))
    });

    tracing::debug!(stored_name = %stored_name, length, "Serving artifact");

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(header::ContentDisposition {
            disposition: header::DispositionType::Attachment,
            parameters: vec![header::DispositionParam::Filename(stored_name.clone())],
        })
        .no_chunking(length)
        .streaming(body))
}

pub fn routes() -> Scope {
    web::scope("/artifacts").service(download)
}

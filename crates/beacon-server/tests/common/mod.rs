//! Test harness: the real route table over in-memory SQLite and a temporary artifact directory

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    App,
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web,
};
use beacon_persistence::{ExternalDbPersistService, PersistenceService, create_schema};
use beacon_release::ArtifactStore;
use beacon_server::{
    auth::token::encode_jwt_token,
    console::v1::route,
    middleware::auth::Authentication,
    model::{AppState, Configuration},
};
use config::Config;
use sea_orm::{ConnectOptions, Database};
use tempfile::TempDir;

pub const SECRET: &str = "VGhpc0lzTXlDdXN0b21TZWNyZXRLZXkwMTIzNDU2Nzg5MDEyMzQ1Njc4OQ==";
pub const CONTEXT_PATH: &str = "/api";
pub const BOUNDARY: &str = "----beacon-test-boundary";

pub struct TestEnv {
    pub state: web::Data<AppState>,
    pub artifact_dir: TempDir,
}

impl TestEnv {
    /// Names of all files currently in the artifact directory
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.artifact_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub async fn setup_with(overrides: &[(&str, &str)], max_file_size: u64) -> TestEnv {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt)
        .await
        .expect("Database connection failed");
    create_schema(&db).await.expect("Schema creation failed");
    let persistence: Arc<dyn PersistenceService> = Arc::new(ExternalDbPersistService::new(db));

    let mut builder = Config::builder()
        .set_override("auth.token.secretKey", SECRET)
        .unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }
    let configuration = Configuration::from_config(builder.build().unwrap());

    let artifact_dir = TempDir::new().unwrap();
    let store = Arc::new(ArtifactStore::new(
        artifact_dir.path(),
        &configuration.artifact_url_prefix(),
        max_file_size,
    ));
    store.init().await.unwrap();

    TestEnv {
        state: web::Data::new(AppState::new(configuration, persistence, store)),
        artifact_dir,
    }
}

pub async fn setup() -> TestEnv {
    setup_with(&[], 1024 * 1024).await
}

pub async fn service(
    env: &TestEnv,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(Authentication)
            .app_data(env.state.clone())
            .service(route::routes(CONTEXT_PATH)),
    )
    .await
}

pub fn bearer(username: &str) -> (&'static str, String) {
    let token = encode_jwt_token(username, SECRET, 3600).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

/// A multipart part: field name, optional file name, content
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

//! Version and artifact endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{Part, bearer, multipart, service, setup, setup_with};

fn publish_request(parts: &[Part<'_>], token: Option<&str>) -> test::TestRequest {
    let (content_type, body) = multipart(parts);
    let mut req = test::TestRequest::post()
        .uri("/api/versions/publish")
        .insert_header(("Content-Type", content_type))
        .set_payload(body);
    if let Some(username) = token {
        req = req.insert_header(bearer(username));
    }
    req
}

fn fields<'a>(project_id: &'a str, version_number: &'a str) -> Vec<Part<'a>> {
    vec![
        ("projectId", None, project_id.as_bytes()),
        ("versionNumber", None, version_number.as_bytes()),
        ("description", None, b"bug fixes".as_slice()),
    ]
}

#[actix_web::test]
async fn test_publish_requires_token() {
    let env = setup().await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("app.zip"), b"PK-data".as_slice()));
    let resp = test::call_service(&app, publish_request(&parts, None).to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(env.stored_files().is_empty());
}

#[actix_web::test]
async fn test_publish_and_download() {
    let env = setup().await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("app.zip"), b"PK-data".as_slice()));
    parts.push(("descriptionFile", Some("notes.md"), b"# notes".as_slice()));
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let version = &body["data"];
    assert_eq!(version["status"], "draft");
    assert_eq!(version["updateType"], "passive");
    assert_eq!(version["publishedBy"], "alice");
    assert_eq!(version["downloadUrl"], "/api/artifacts/app.zip");
    assert_eq!(version["originalFileName"], "app.zip");
    assert_eq!(version["fileExt"], ".zip");
    assert_eq!(version["fileSize"], 7);
    assert_eq!(version["descriptionFileUrl"], "/api/artifacts/notes.md");
    assert_eq!(env.stored_files(), vec!["app.zip", "notes.md"]);

    let req = test::TestRequest::get()
        .uri("/api/artifacts/app.zip")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"PK-data");
}

#[actix_web::test]
async fn test_publish_with_rename_hides_original_name() {
    let env = setup().await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("enableRename", None, b"true".as_slice()));
    parts.push(("updateType", None, b"force".as_slice()));
    parts.push(("file", Some("setup.exe"), b"MZ".as_slice()));
    let body: Value = test::call_and_read_body_json(
        &app,
        publish_request(&parts, Some("alice")).to_request(),
    )
    .await;

    let url = body["data"]["downloadUrl"].as_str().unwrap();
    assert!(url.starts_with("/api/artifacts/"));
    assert!(url.ends_with(".exe"));
    assert_ne!(url, "/api/artifacts/setup.exe");
    assert_eq!(body["data"]["originalFileName"], "setup.exe");
    assert_eq!(body["data"]["updateType"], "force");
    assert_eq!(env.stored_files().len(), 1);
}

#[actix_web::test]
async fn test_failed_publish_leaves_no_files() {
    let env = setup().await;
    let app = service(&env).await;

    let parts: Vec<Part<'_>> = vec![
        ("projectId", None, b"p1".as_slice()),
        ("versionNumber", None, b"1.0.0".as_slice()),
        ("file", Some("app.zip"), b"PK-data".as_slice()),
    ];
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "description is required");
    assert!(env.stored_files().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/versions?projectId=p1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn test_oversized_upload_is_rejected() {
    let env = setup_with(&[], 4).await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("big.bin"), b"0123456789".as_slice()));
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(env.stored_files().is_empty());
}

#[actix_web::test]
async fn test_duplicate_version_number_conflicts() {
    let env = setup().await;
    let app = service(&env).await;

    let parts = fields("p1", "1.0.0");
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("other.zip"), b"PK".as_slice()));
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(env.stored_files().is_empty());
}

#[actix_web::test]
async fn test_conflicting_publish_keeps_live_artifact() {
    let env = setup().await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("app.zip"), b"v1".as_slice()));
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("app.zip"), b"v2".as_slice()));
    let resp =
        test::call_service(&app, publish_request(&parts, Some("alice")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(env.stored_files(), vec!["app.zip"]);

    let req = test::TestRequest::get()
        .uri("/api/artifacts/app.zip")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"v1");
}

async fn publish_draft(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    version_number: &str,
) -> i64 {
    let parts = fields("p1", version_number);
    let body: Value =
        test::call_and_read_body_json(app, publish_request(&parts, Some("alice")).to_request())
            .await;
    body["data"]["id"].as_i64().unwrap()
}

#[actix_web::test]
async fn test_promote_and_latest() {
    let env = setup().await;
    let app = service(&env).await;

    let req = test::TestRequest::get()
        .uri("/api/versions/latest?projectId=p1")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let v1 = publish_draft(&app, "1.0.0").await;
    let v2 = publish_draft(&app, "1.1.0").await;

    for id in [v1, v2] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/versions/{}/promote", id))
            .insert_header(bearer("alice"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "published");
    }

    let req = test::TestRequest::get()
        .uri("/api/versions/latest?projectId=p1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], v2);

    let req = test::TestRequest::get()
        .uri("/api/versions/latest/p1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], v2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/versions/{}", v1))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "deprecated");
}

#[actix_web::test]
async fn test_update_to_published_demotes_others() {
    let env = setup().await;
    let app = service(&env).await;

    let v1 = publish_draft(&app, "1.0.0").await;
    let v2 = publish_draft(&app, "1.1.0").await;

    for id in [v1, v2] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/versions/{}", id))
            .insert_header(bearer("alice"))
            .set_json(json!({"status": "published", "description": "stable"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/versions?projectId=p1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let published: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["status"] == "published")
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(published, vec![v2]);
}

#[actix_web::test]
async fn test_delete_twice() {
    let env = setup().await;
    let app = service(&env).await;

    let mut parts = fields("p1", "1.0.0");
    parts.push(("file", Some("app.zip"), b"PK".as_slice()));
    let body: Value = test::call_and_read_body_json(
        &app,
        publish_request(&parts, Some("alice")).to_request(),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/versions/{}", id))
        .insert_header(bearer("alice"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(env.stored_files().is_empty());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/versions/{}", id))
        .insert_header(bearer("alice"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri("/api/artifacts/app.zip")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_auth_disabled_uses_default_actor() {
    let env = setup_with(&[("auth.enabled", "false"), ("auth.defaultActor", "ops")], 1024).await;
    let app = service(&env).await;

    let parts: Vec<Part<'_>> = vec![
        ("projectId", None, b"p1".as_slice()),
        ("versionNumber", None, b"2.0.0".as_slice()),
        ("description", None, b"no auth".as_slice()),
    ];
    let resp = test::call_service(&app, publish_request(&parts, None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["publishedBy"], "ops");
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let env = setup().await;
    let app = service(&env).await;

    let req = test::TestRequest::put()
        .uri("/api/versions/1/promote")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

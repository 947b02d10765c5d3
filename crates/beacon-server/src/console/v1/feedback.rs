use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use serde::Deserialize;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    service::feedback::{FeedbackSubmission, FeedbackUpdate},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    project_id: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

#[post("")]
async fn submit(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<FeedbackSubmission>,
) -> actix_web::Result<HttpResponse, AppError> {
    let peer_ip = super::peer_ip(&req);
    let feedback = data
        .feedback_service
        .submit(body.into_inner(), peer_ip.as_deref())
        .await?;

    Ok(Result::http_created(feedback))
}

#[get("")]
async fn search(
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> actix_web::Result<HttpResponse, AppError> {
    let page = data
        .feedback_service
        .list(params.project_id.as_deref(), params.page, params.page_size)
        .await?;

    Ok(Result::http_page(page.page_items, page.total_count))
}

#[get("/{id}")]
async fn find_one(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let feedback = data.feedback_service.find(path.into_inner()).await?;

    Ok(Result::http_success(feedback))
}

#[put("/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<FeedbackUpdate>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);

    let feedback = data
        .feedback_service
        .update_status_and_reply(path.into_inner(), body.into_inner(), &principal.username)
        .await?;

    Ok(Result::http_success(feedback))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);

    data.feedback_service
        .delete(path.into_inner(), &principal.username)
        .await?;

    Ok(Result::http_success(true))
}

pub fn routes() -> Scope {
    web::scope("/feedback")
        .service(submit)
        .service(search)
        .service(find_one)
        .service(update)
        .service(remove)
}

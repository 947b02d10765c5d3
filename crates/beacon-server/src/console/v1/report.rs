use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use serde::Deserialize;

use crate::{
    error::AppError,
    model::{AppState, response::Result},
    secured,
    service::report::ReportSubmission,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateParam {
    project_id: Option<String>,
    #[serde(alias = "pageCurrent", alias = "pageNo")]
    page: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryParam {
    project_id: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

#[post("")]
async fn submit(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ReportSubmission>,
) -> actix_web::Result<HttpResponse, AppError> {
    let peer_ip = super::peer_ip(&req);
    let report = data
        .report_service
        .submit(body.into_inner(), peer_ip.as_deref())
        .await?;

    Ok(Result::http_created(report))
}

#[post("/aggregate")]
async fn aggregate(
    data: web::Data<AppState>,
    body: web::Json<AggregateParam>,
) -> actix_web::Result<HttpResponse, AppError> {
    let page = data
        .report_service
        .latest_per_user(body.project_id.as_deref(), body.page, body.page_size)
        .await?;

    Ok(Result::http_page(page.page_items, page.total_count))
}

#[get("/users/{username}")]
async fn user_history(
    data: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<HistoryParam>,
) -> actix_web::Result<HttpResponse, AppError> {
    let page = data
        .report_service
        .user_history(
            params.project_id.as_deref(),
            &path.into_inner(),
            params.page,
            params.page_size,
        )
        .await?;

    Ok(Result::http_page(page.page_items, page.total_count))
}

#[get("/{id}")]
async fn find_one(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let report = data.report_service.find(path.into_inner()).await?;

    Ok(Result::http_success(report))
}

#[delete("/{id}")]
async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse, AppError> {
    let principal = secured!(req);

    data.report_service
        .delete(path.into_inner(), &principal.username)
        .await?;

    Ok(Result::http_success(true))
}

pub fn routes() -> Scope {
    web::scope("/reports")
        .service(submit)
        .service(aggregate)
        .service(user_history)
        .service(find_one)
        .service(remove)
}

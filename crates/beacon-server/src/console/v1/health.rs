use actix_web::{HttpResponse, Scope, get, web};
use serde::Serialize;

use crate::model::{AppState, response::Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HealthStatus {
    fn up() -> Self {
        Self {
            status: "UP".to_string(),
            database: None,
        }
    }
}

#[get("/liveness")]
async fn liveness() -> HttpResponse {
    Result::http_success(HealthStatus::up())
}

#[get("/readiness")]
async fn readiness(data: web::Data<AppState>) -> HttpResponse {
    match data.persistence.health_check().await {
        Ok(()) => Result::http_success(HealthStatus {
            status: "UP".to_string(),
            database: Some("UP".to_string()),
        }),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(Result {
                success: false,
                code: crate::error::DATA_ACCESS_ERROR.code,
                message: Some("database unavailable".to_string()),
                data: Some(HealthStatus {
                    status: "DOWN".to_string(),
                    database: Some("DOWN".to_string()),
                }),
                total: None,
            })
        }
    }
}

pub fn routes() -> Scope {
    web::scope("/health").service(liveness).service(readiness)
}

use actix_web::{
    Scope,
    error::{JsonPayloadError, QueryPayloadError},
    web,
};

use beacon_common::BeaconError;

use super::{artifact, feedback, health, report, version};
use crate::error::AppError;

fn json_error(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    let error = match err {
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            BeaconError::PayloadTooLarge(format!("request body exceeds {} bytes", limit))
        }
        other => BeaconError::Validation(format!("malformed request body: {}", other)),
    };
    AppError::from(error).into()
}

fn query_error(err: QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::from(BeaconError::Validation(format!(
        "malformed query string: {}",
        err
    )))
    .into()
}

fn path_error(err: actix_web::error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::from(BeaconError::Validation(format!("malformed path: {}", err))).into()
}

/// Route table of the console API, mounted under the context path
pub fn routes(context_path: &str) -> Scope {
    web::scope(context_path)
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::routes())
        .service(report::routes())
        .service(version::routes())
        .service(artifact::routes())
        .service(feedback::routes())
}

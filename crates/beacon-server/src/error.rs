// Error handling for the HTTP layer
// Domain errors travel as `BeaconError` inside `anyhow::Error` and are
// turned into the response envelope here.

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;

pub use beacon_common::error::{
    ACCESS_DENIED, DATA_ACCESS_ERROR, OVER_MAX_SIZE, PARAMETER_MISSING, PARAMETER_VALIDATE_ERROR,
    RESOURCE_CONFLICT, RESOURCE_NOT_FOUND, SERVER_ERROR, SUCCESS,
};
pub use beacon_common::{BeaconError, ErrorCode};

use crate::model::response;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<BeaconError> for AppError {
    fn from(value: BeaconError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

/// Caller-facing text of a domain error
fn client_message(error: &BeaconError) -> String {
    match error {
        BeaconError::Validation(message)
        | BeaconError::Conflict(message)
        | BeaconError::AuthError(message)
        | BeaconError::Forbidden(message)
        | BeaconError::PayloadTooLarge(message) => message.clone(),
        BeaconError::NotFound(_) => error.to_string(),
        BeaconError::Storage(_) | BeaconError::Internal(_) => error.error_code().message.to_string(),
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self.downcast_ref::<BeaconError>() {
            Some(e) if e.is_client_error() => {
                let code = match e {
                    BeaconError::Validation(message) if message.ends_with("is required") => {
                        PARAMETER_MISSING.code
                    }
                    _ => e.error_code().code,
                };
                response::Result::http_response(e.status_code(), code, client_message(e))
            }
            Some(e) => {
                tracing::error!(error = ?self.inner, "Request failed");
                response::Result::http_response(
                    e.status_code(),
                    e.error_code().code,
                    client_message(e),
                )
            }
            None => {
                tracing::error!(error = ?self.inner, "Request failed with unexpected error");
                response::Result::http_response(
                    500,
                    SERVER_ERROR.code,
                    SERVER_ERROR.message.to_string(),
                )
            }
        }
    }
}

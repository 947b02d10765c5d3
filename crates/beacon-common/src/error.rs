//! Error types and error codes for Beacon
//!
//! This module defines:
//! - `BeaconError`: domain error enum raised by every layer
//! - `ErrorCode`: structured error codes carried in API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BeaconError {
    #[error("caused: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BeaconError {
    /// Error code reported in the response envelope for this error
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            BeaconError::Validation(_) => PARAMETER_VALIDATE_ERROR,
            BeaconError::NotFound(_) => RESOURCE_NOT_FOUND,
            BeaconError::Conflict(_) => RESOURCE_CONFLICT,
            BeaconError::Storage(_) => DATA_ACCESS_ERROR,
            BeaconError::AuthError(_) | BeaconError::Forbidden(_) => ACCESS_DENIED,
            BeaconError::PayloadTooLarge(_) => OVER_MAX_SIZE,
            BeaconError::Internal(_) => SERVER_ERROR,
        }
    }

    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            BeaconError::Validation(_) => 400,
            BeaconError::AuthError(_) => 401,
            BeaconError::Forbidden(_) => 403,
            BeaconError::NotFound(_) => 404,
            BeaconError::Conflict(_) => 409,
            BeaconError::PayloadTooLarge(_) => 413,
            BeaconError::Storage(_) | BeaconError::Internal(_) => 500,
        }
    }

    /// Whether the error detail may be shown to the caller
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const OVER_MAX_SIZE: ErrorCode<'static> = ErrorCode {
    code: 5034,
    message: "upload size is over limit",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

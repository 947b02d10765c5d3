//! HTTP response envelope
//!
//! Every endpoint answers with `{success, code, message?, data?, total?}`.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use beacon_common::error::SUCCESS;
use serde::{Deserialize, Serialize};

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub success: bool,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T: Serialize> Result<T> {
    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            success: true,
            code: SUCCESS.code,
            message: None,
            data: Some(data),
            total: None,
        }
    }

    pub fn page(data: T, total: u64) -> Result<T> {
        Result::<T> {
            total: Some(total),
            ..Result::success(data)
        }
    }

    pub fn http_success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Result::success(data))
    }

    pub fn http_page(data: T, total: u64) -> HttpResponse {
        HttpResponse::Ok().json(Result::page(data, total))
    }
}

impl Result<()> {
    pub fn fail(code: i32, message: String) -> Result<()> {
        Result::<()> {
            success: false,
            code,
            message: Some(message),
            data: None,
            total: None,
        }
    }

    pub fn http_response(status: u16, code: i32, message: String) -> HttpResponse {
        HttpResponseBuilder::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(Result::fail(code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(Result::success("ok")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], "ok");
        assert!(json.get("message").is_none());
        assert!(json.get("total").is_none());
    }

    #[test]
    fn test_page_envelope() {
        let json = serde_json::to_value(Result::page(vec![1, 2], 7)).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_fail_envelope() {
        let json = serde_json::to_value(Result::fail(20004, "gone".to_string())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 20004);
        assert_eq!(json["message"], "gone");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_http_response_status() {
        let resp = Result::http_response(404, 20004, "gone".to_string());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

// Authorization guard for mutation endpoints

use actix_web::{HttpMessage, HttpRequest};

use beacon_common::BeaconError;

pub use crate::auth::model::{AuthContext, Principal};

/// The verified caller of a request
pub fn principal(req: &HttpRequest) -> Result<Principal, BeaconError> {
    match req.extensions().get::<AuthContext>() {
        Some(AuthContext::Authenticated(principal)) => Ok(principal.clone()),
        Some(AuthContext::Rejected(reason)) => {
            Err(BeaconError::AuthError(format!("invalid access token: {}", reason)))
        }
        Some(AuthContext::Anonymous) => {
            Err(BeaconError::AuthError("no access token provided".to_string()))
        }
        None => Err(BeaconError::AuthError("no auth context found".to_string())),
    }
}

/// Resolve the caller or return the authorization-denied envelope.
///
/// Expands to the `Principal`; must run before the request body is read.
#[macro_export]
macro_rules! secured {
    ($req: expr) => {
        match $crate::secured::principal(&$req) {
            Ok(__principal) => __principal,
            Err(__error) => {
                tracing::warn!(path = %$req.path(), error = %__error, "Request not authorized");
                return Err($crate::error::AppError::from(__error));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_principal_authenticated() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(AuthContext::authenticated("alice"));
        assert_eq!(principal(&req).unwrap().username, "alice");
    }

    #[test]
    fn test_principal_denied() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(principal(&req), Err(BeaconError::AuthError(_))));

        req.extensions_mut().insert(AuthContext::Anonymous);
        assert!(matches!(principal(&req), Err(BeaconError::AuthError(_))));

        req.extensions_mut()
            .insert(AuthContext::Rejected("ExpiredSignature".to_string()));
        let err = principal(&req).unwrap_err();
        assert!(err.to_string().contains("ExpiredSignature"));
    }
}

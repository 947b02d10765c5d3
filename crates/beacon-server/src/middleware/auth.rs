// Authentication middleware for Actix-web
// Resolves the caller of every request into an `AuthContext`; handlers that
// mutate state consult it through `secured!`.

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
};

use futures::future::LocalBoxFuture;

use crate::{
    auth::{model::AuthContext, token},
    model::AppState,
};

const ACCESS_TOKEN: &str = "accessToken";
const AUTHORIZATION_HEADER: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

// Authentication middleware transformer
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware { service })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
}

/// Extract token from request using 3 sources in priority order:
/// 1. `Authorization: Bearer <token>` header
/// 2. `accessToken` HTTP header
/// 3. `accessToken` query parameter
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(header_val) = req.headers().get(AUTHORIZATION_HEADER)
        && let Ok(s) = header_val.to_str()
        && let Some(token) = s.trim().strip_prefix(BEARER_PREFIX)
    {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    if let Some(header_val) = req.headers().get(ACCESS_TOKEN)
        && let Ok(s) = header_val.to_str()
    {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    if let Some(query) = req.uri().query() {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=')
                && key == ACCESS_TOKEN
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    None
}

fn resolve(req: &ServiceRequest, app_state: &AppState) -> AuthContext {
    let configuration = &app_state.configuration;

    if !configuration.auth_enabled() {
        return AuthContext::authenticated(&configuration.default_actor());
    }

    let Some(token) = extract_token(req) else {
        return AuthContext::Anonymous;
    };

    match token::decode_jwt_token_cached(&token, &configuration.token_secret_key()) {
        Ok(claims) => AuthContext::authenticated(&claims.sub),
        Err(err) => {
            tracing::debug!(path = %req.path(), error = %err, "Access token rejected");
            AuthContext::Rejected(err.to_string())
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if Method::OPTIONS != *req.method() {
            let auth_context = match req.app_data::<Data<AppState>>() {
                Some(app_state) => resolve(&req, app_state),
                None => {
                    tracing::error!("AppState not found in request app_data");
                    AuthContext::Anonymous
                }
            };

            req.extensions_mut().insert(auth_context);
        }

        let res = self.service.call(req);

        Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
    }
}

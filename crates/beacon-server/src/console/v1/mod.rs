//! Console API handlers

pub mod artifact;
pub mod feedback;
pub mod health;
pub mod report;
pub mod route;
pub mod version;

use actix_web::HttpRequest;

/// Address of the caller as seen through proxies
pub(crate) fn peer_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
}

//! Application startup utilities module.

mod http;
pub mod logging;

pub use http::http_server;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};

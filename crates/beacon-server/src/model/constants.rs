//! Configuration keys and defaults

pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_CONTEXT_PATH: &str = "server.contextPath";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3001;
pub const DEFAULT_CONTEXT_PATH: &str = "/api";

pub const DB_URL: &str = "db.url";
pub const DB_AUTO_MIGRATE: &str = "db.autoMigrate";
pub const DB_MAX_POOL_SIZE: &str = "db.pool.maximumPoolSize";
pub const DB_MIN_POOL_SIZE: &str = "db.pool.minimumPoolSize";
pub const DB_CONNECTION_TIMEOUT: &str = "db.pool.connectionTimeout";
pub const DB_IDLE_TIMEOUT: &str = "db.pool.idleTimeout";
pub const DB_SQLX_LOGGING: &str = "db.pool.sqlxLogging";

pub const DEFAULT_DB_URL: &str = "sqlite://beacon.db?mode=rwc";

pub const ARTIFACT_DIR: &str = "artifact.dir";
pub const ARTIFACT_URL_PREFIX: &str = "artifact.urlPrefix";
pub const ARTIFACT_MAX_FILE_SIZE: &str = "artifact.maxFileSize";

pub const DEFAULT_ARTIFACT_DIR: &str = "uploads";
/// 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const AUTH_ENABLED: &str = "auth.enabled";
pub const AUTH_TOKEN_SECRET_KEY: &str = "auth.token.secretKey";
pub const AUTH_DEFAULT_ACTOR: &str = "auth.defaultActor";

pub const DEFAULT_ACTOR: &str = "admin";

pub const LOGGING_DIR: &str = "logging.dir";
pub const LOGGING_CONSOLE: &str = "logging.console";
pub const LOGGING_FILE: &str = "logging.file";
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_ROTATION: &str = "logging.rotation";

/// Environment variable prefix, `BEACON_SERVER__PORT` maps to `server.port`
pub const ENV_PREFIX: &str = "BEACON";
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

//! Configuration management for the Beacon server
//!
//! Values are read, lowest precedence first, from `conf/application.yml`
//! (or `--config`), `BEACON_*` environment variables and command line flags.

use std::time::Duration;

use base64::Engine;
use clap::Parser;
use config::{Config, ConfigError, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::startup::LoggingConfig;

use super::constants::*;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "beacon", about = "Beacon report, feedback and release console")]
struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(long = "artifact-dir")]
    artifact_dir: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration for the running process
    pub fn new() -> Result<Self, ConfigError> {
        let args = Cli::parse();

        let config_file = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(config_file).required(args.config.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT, i64::from(v))?;
        }
        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DB_URL, v)?;
        }
        if let Some(v) = args.artifact_dir {
            config_builder = config_builder.set_override(ARTIFACT_DIR, v)?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    /// Wrap an already built `Config`
    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    /// Fail fast on values the server cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_enabled() {
            let secret = self.token_secret_key();
            if secret.is_empty() {
                return Err(format!(
                    "{} is required when {} is true",
                    AUTH_TOKEN_SECRET_KEY, AUTH_ENABLED
                ));
            }
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(secret.as_bytes())
                .map_err(|e| format!("{} is not valid base64: {}", AUTH_TOKEN_SECRET_KEY, e))?;
            if decoded.len() < 32 {
                return Err(format!(
                    "{} must decode to at least 32 bytes",
                    AUTH_TOKEN_SECRET_KEY
                ));
            }
        }

        if self.artifact_max_file_size() == 0 {
            return Err(format!("{} must be greater than 0", ARTIFACT_MAX_FILE_SIZE));
        }

        let context_path = self.server_context_path();
        if !context_path.is_empty() && !context_path.starts_with('/') {
            return Err(format!("{} must start with '/'", SERVER_CONTEXT_PATH));
        }

        Ok(())
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    pub fn server_context_path(&self) -> String {
        self.config
            .get_string(SERVER_CONTEXT_PATH)
            .unwrap_or(DEFAULT_CONTEXT_PATH.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    // ========================================================================
    // Artifact Configuration
    // ========================================================================

    pub fn artifact_dir(&self) -> String {
        self.config
            .get_string(ARTIFACT_DIR)
            .unwrap_or(DEFAULT_ARTIFACT_DIR.to_string())
    }

    /// Public URL prefix of stored artifacts, `<contextPath>/artifacts` by default
    pub fn artifact_url_prefix(&self) -> String {
        self.config
            .get_string(ARTIFACT_URL_PREFIX)
            .unwrap_or_else(|_| format!("{}/artifacts", self.server_context_path()))
    }

    pub fn artifact_max_file_size(&self) -> u64 {
        self.config
            .get_int(ARTIFACT_MAX_FILE_SIZE)
            .map(|v| v.max(0) as u64)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    // ========================================================================
    // Authentication Configuration
    // ========================================================================

    pub fn auth_enabled(&self) -> bool {
        self.config.get_bool(AUTH_ENABLED).unwrap_or(true)
    }

    pub fn token_secret_key(&self) -> String {
        self.config
            .get_string(AUTH_TOKEN_SECRET_KEY)
            .unwrap_or_default()
    }

    /// Actor recorded when auth is disabled
    pub fn default_actor(&self) -> String {
        self.config
            .get_string(AUTH_DEFAULT_ACTOR)
            .unwrap_or(DEFAULT_ACTOR.to_string())
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGGING_DIR).ok(),
            self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGGING_FILE).unwrap_or(false),
            self.config
                .get_string(LOGGING_LEVEL)
                .unwrap_or("info".to_string()),
            self.config.get_string(LOGGING_ROTATION).ok(),
        )
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> String {
        self.config
            .get_string(DB_URL)
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    /// Create missing tables at startup
    pub fn auto_migrate(&self) -> bool {
        self.config.get_bool(DB_AUTO_MIGRATE).unwrap_or(true)
    }

    pub fn database_connect_options(&self) -> ConnectOptions {
        let max_connections = self.config.get_int(DB_MAX_POOL_SIZE).unwrap_or(10) as u32;
        let min_connections = self.config.get_int(DB_MIN_POOL_SIZE).unwrap_or(1) as u32;
        let connect_timeout = self.config.get_int(DB_CONNECTION_TIMEOUT).unwrap_or(30) as u64;
        let idle_timeout = self.config.get_int(DB_IDLE_TIMEOUT).unwrap_or(600) as u64;
        let sqlx_logging = self.config.get_bool(DB_SQLX_LOGGING).unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url());

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(connect_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        opt
    }

    pub async fn database_connection(&self) -> Result<DatabaseConnection, sea_orm::DbErr> {
        Database::connect(self.database_connect_options()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "VGhpc0lzTXlDdXN0b21TZWNyZXRLZXkwMTIzNDU2Nzg5MDEyMzQ1Njc4OQ==";

    fn configuration(overrides: &[(&str, &str)]) -> Configuration {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Configuration::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = configuration(&[]);
        assert_eq!(config.server_address(), "0.0.0.0");
        assert_eq!(config.server_port(), 3001);
        assert_eq!(config.server_context_path(), "/api");
        assert_eq!(config.artifact_dir(), "uploads");
        assert_eq!(config.artifact_url_prefix(), "/api/artifacts");
        assert_eq!(config.artifact_max_file_size(), 10 * 1024 * 1024);
        assert!(config.auth_enabled());
        assert_eq!(config.default_actor(), "admin");
        assert_eq!(config.database_url(), "sqlite://beacon.db?mode=rwc");
        assert!(config.auto_migrate());
    }

    #[test]
    fn test_overrides() {
        let config = configuration(&[
            (SERVER_PORT, "8080"),
            (SERVER_CONTEXT_PATH, "/console/"),
            (ARTIFACT_MAX_FILE_SIZE, "2048"),
            (AUTH_ENABLED, "false"),
        ]);
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.server_context_path(), "/console");
        assert_eq!(config.artifact_url_prefix(), "/console/artifacts");
        assert_eq!(config.artifact_max_file_size(), 2048);
        assert!(!config.auth_enabled());
    }

    #[test]
    fn test_validate_requires_secret_when_auth_enabled() {
        assert!(configuration(&[]).validate().is_err());
        assert!(
            configuration(&[(AUTH_TOKEN_SECRET_KEY, "not base64!")])
                .validate()
                .is_err()
        );
        assert!(
            configuration(&[(AUTH_TOKEN_SECRET_KEY, "c2hvcnQ=")])
                .validate()
                .is_err()
        );
        assert!(
            configuration(&[(AUTH_TOKEN_SECRET_KEY, SECRET)])
                .validate()
                .is_ok()
        );
        assert!(configuration(&[(AUTH_ENABLED, "false")]).validate().is_ok());
    }

    #[test]
    fn test_validate_context_path() {
        let config = configuration(&[(AUTH_ENABLED, "false"), (SERVER_CONTEXT_PATH, "api")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config() {
        let config = configuration(&[(LOGGING_LEVEL, "debug"), (LOGGING_FILE, "true")]);
        let logging = config.logging_config();
        assert!(logging.file_logging);
        assert_eq!(logging.console_level, tracing::Level::DEBUG);
    }
}

//! Shared test infrastructure: an in-memory SQLite database with the schema applied

use beacon_persistence::{ExternalDbPersistService, NewReport, create_schema};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database};

/// Single connection, so every query sees the same in-memory database
pub async fn setup() -> ExternalDbPersistService {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Database connection failed");
    create_schema(&db).await.expect("Schema creation failed");

    ExternalDbPersistService::new(db)
}

/// Fixed base time plus an offset in seconds
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::seconds(seconds)
}

#[allow(dead_code)]
pub fn report(project_id: &str, username: &str, seconds: i64, remark: &str) -> NewReport {
    NewReport {
        project_id: project_id.to_string(),
        username: username.to_string(),
        ip: "10.0.0.1".to_string(),
        timestamp: at(seconds),
        version: "1.0.0".to_string(),
        remark: remark.to_string(),
        ..Default::default()
    }
}

//! SQL-based persistence backend (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! `ExternalDbPersistService` implements every persistence trait over a
//! single SeaORM `DatabaseConnection`. The trait implementations live in
//! one submodule per entity.

mod feedback;
mod report;
mod version;

use async_trait::async_trait;
use beacon_common::BeaconError;
use sea_orm::{prelude::Expr, *};

use crate::entity::report as report_entity;
use crate::traits::*;

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` and implements all persistence traits
/// by issuing direct database queries.
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    /// Create a new ExternalDbPersistService with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    async fn health_check(&self) -> anyhow::Result<()> {
        // Execute a simple query to verify connectivity
        report_entity::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

/// Turn a unique-constraint violation into a `Conflict`, keep anything else as is
fn conflict_on_unique(err: DbErr, message: impl FnOnce() -> String) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => BeaconError::Conflict(message()).into(),
        _ => err.into(),
    }
}

//! Schema bootstrap
//!
//! Creates the tables from the entity definitions together with the indexes
//! the queries rely on. Safe to run on every startup.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, Schema,
    sea_query::{Index, IndexCreateStatement},
};

use crate::entity::{feedback, feedback_reply, report, version};

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_report_project_user_time")
            .table(report::Entity)
            .col(report::Column::ProjectId)
            .col(report::Column::Username)
            .col(report::Column::ReportedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_feedback_project_created")
            .table(feedback::Entity)
            .col(feedback::Column::ProjectId)
            .col(feedback::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_feedback_reply_feedback")
            .table(feedback_reply::Entity)
            .col(feedback_reply::Column::FeedbackId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_version_project")
            .table(version::Entity)
            .col(version::Column::ProjectId)
            .col(version::Column::Status)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_version_project_number")
            .table(version::Entity)
            .col(version::Column::ProjectId)
            .col(version::Column::VersionNumber)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let statement = schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();

    db.execute(backend.build(&statement)).await?;

    Ok(())
}

/// Create all tables and indexes that do not exist yet
pub async fn create_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, &schema, report::Entity).await?;
    create_table(db, &schema, feedback::Entity).await?;
    create_table(db, &schema, feedback_reply::Entity).await?;
    create_table(db, &schema, version::Entity).await?;

    for index in indexes() {
        // MySQL has no IF NOT EXISTS for indexes, an existing one fails here
        if let Err(e) = db.execute(backend.build(&index)).await {
            tracing::debug!(error = %e, "Index not created");
        }
    }

    tracing::info!(backend = ?backend, "Database schema ready");

    Ok(())
}

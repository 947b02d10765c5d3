//! Report entity
//!
//! One usage ping sent by a client. Rows are never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: String,
    pub username: String,
    pub ip: String,
    /// When the client produced the report
    pub reported_at: DateTime,
    pub version: String,
    #[sea_orm(column_type = "Text")]
    pub remark: String,
    #[sea_orm(column_type = "Text")]
    pub device_info: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub location: String,
    /// Free-form JSON document
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_data: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

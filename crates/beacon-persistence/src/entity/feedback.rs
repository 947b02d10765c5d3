use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: String,
    pub username: String,
    #[sea_orm(nullable)]
    pub email: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub ip: String,
    /// pending, reviewed or resolved
    pub status: String,
    /// Text of the most recent reply
    #[sea_orm(column_type = "Text", nullable)]
    pub reply_input: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

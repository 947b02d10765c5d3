//! Version entity
//!
//! A release record of a project, optionally bound to an uploaded artifact
//! and a release-notes file.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "version")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: String,
    pub version_number: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// draft, published or deprecated
    pub status: String,
    /// force, active or passive
    pub update_type: String,
    #[sea_orm(nullable)]
    pub download_url: Option<String>,
    #[sea_orm(nullable)]
    pub original_file_name: Option<String>,
    #[sea_orm(nullable)]
    pub file_ext: Option<String>,
    #[sea_orm(nullable)]
    pub file_size: Option<i64>,
    #[sea_orm(nullable)]
    pub description_file_url: Option<String>,
    #[sea_orm(nullable)]
    pub description_file_name: Option<String>,
    pub published_by: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

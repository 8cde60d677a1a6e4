use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A captured image and the metadata the user attached to it.
///
/// `blob` and `timestamp` are written once when the row is inserted, only the
/// descriptive fields are ever updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Blob")]
    #[serde(skip)]
    pub blob: Vec<u8>,
    pub name: String,
    pub caption: Option<String>,
    // `group` is a reserved word in SQL
    #[sea_orm(column_name = "group_name")]
    pub group: Option<String>,
    /// Creation instant in milliseconds since the Unix epoch.
    #[sea_orm(indexed)]
    pub timestamp: i64,
}

impl Model {
    pub fn in_group(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

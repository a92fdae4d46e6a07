//! SeaORM entity for the database-stored settings rows

use sea_orm::entity::prelude::*;

/// One configuration key per row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "wiki_configuration")]
pub struct Model {
    /// Field name (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    /// Value rendered as text; booleans as `true`/`false`
    pub value: String,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

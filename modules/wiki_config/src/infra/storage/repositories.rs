//! SeaORM backing store implementation

use crate::domain::repository::ConfigurationStore;
use crate::domain::StoredSettings;
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::sync::Arc;

use super::entity;

/// Configuration stored as key/value rows in `wiki_configuration`
pub struct SeaOrmConfigurationStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmConfigurationStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConfigurationStore for SeaOrmConfigurationStore {
    async fn load(&self) -> Result<StoredSettings> {
        let rows = entity::Entity::find()
            .order_by_asc(entity::Column::Key)
            .all(&*self.db)
            .await?;

        Ok(StoredSettings::from_pairs(
            rows.into_iter().map(|row| (row.key, row.value)),
        )?)
    }

    async fn save(&self, settings: &StoredSettings) -> Result<()> {
        use sea_orm::ActiveValue::Set;

        let now = chrono::Utc::now();
        let pairs = settings.to_string_pairs();
        let txn = self.db.begin().await?;

        // Rows for keys absent from the document are dropped
        let removed = entity::Entity::delete_many()
            .filter(entity::Column::Key.is_not_in(pairs.iter().map(|(key, _)| key.clone())))
            .exec(&txn)
            .await?;
        if removed.rows_affected > 0 {
            tracing::debug!(
                rows = removed.rows_affected,
                "Removed configuration rows absent from document"
            );
        }

        for (key, value) in pairs {
            let active = entity::ActiveModel {
                key: Set(key),
                value: Set(value),
                updated_at: Set(now),
            };
            entity::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(entity::Column::Key)
                        .update_columns([entity::Column::Value, entity::Column::UpdatedAt])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        "database table wiki_configuration".to_string()
    }
}

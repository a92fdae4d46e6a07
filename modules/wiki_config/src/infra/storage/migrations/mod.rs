//! Database migrations for the wiki configuration

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000001_create_wiki_configuration::Migration)]
    }
}

mod m20250301_000001_create_wiki_configuration {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WikiConfiguration::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WikiConfiguration::Key)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(WikiConfiguration::Value).text().not_null())
                        .col(
                            ColumnDef::new(WikiConfiguration::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WikiConfiguration::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum WikiConfiguration {
        Table,
        Key,
        Value,
        UpdatedAt,
    }
}

use entity::prelude::*;
use sea_orm::Schema;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The id column is spelled out so SQLite gets `INTEGER PRIMARY KEY
        // AUTOINCREMENT`, which keeps ids of deleted rows from being handed out
        // again.
        manager
            .create_table(
                Table::create()
                    .table(Photo)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(photo::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(photo::Column::Blob).blob().not_null())
                    .col(ColumnDef::new(photo::Column::Name).string().not_null())
                    .col(ColumnDef::new(photo::Column::Caption).string())
                    .col(ColumnDef::new(photo::Column::Group).string())
                    .col(
                        ColumnDef::new(photo::Column::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);
        for mut index in schema.create_index_from_entity(Photo) {
            manager.create_index(index.if_not_exists().take()).await?
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo).to_owned())
            .await?;

        Ok(())
    }
}

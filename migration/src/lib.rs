pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_photos_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261018_000001_create_photos_table::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

    use super::*;

    async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        Database::connect(options).await.unwrap()
    }

    #[tokio::test]
    async fn test_up_is_idempotent() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        // A second run finds nothing pending.
        Migrator::up(&db, None).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'index' AND tbl_name = 'photos' AND sql LIKE '%timestamp%'",
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn test_down_drops_table() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        Migrator::down(&db, None).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'photos'",
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 0);
    }
}

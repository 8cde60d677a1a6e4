//! Provide the interface to the database
//
// Every read and write of photo records goes through `PhotoStore`. The
// connection is opened lazily on the first operation and shared afterwards,
// so the store is cheap to construct and safe to call from anywhere.

use std::sync::OnceLock;

use entity::photo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use time::OffsetDateTime;
use tokio::sync::Mutex;

mod record;

pub use self::record::{default_name, NewPhoto, PhotoUpdate};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

pub struct PhotoStore {
    config: StoreConfig,
    connection: Mutex<Option<DatabaseConnection>>,
}

static GLOBAL_STORE: OnceLock<PhotoStore> = OnceLock::new();

impl PhotoStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
        }
    }

    /// The process wide store. Backed by the default database location unless
    /// [`PhotoStore::init_global`] ran first.
    pub fn global() -> &'static PhotoStore {
        GLOBAL_STORE.get_or_init(|| PhotoStore::new(StoreConfig::default()))
    }

    /// Set up the process wide store with `config`. Only the first call
    /// decides the configuration, later ones get the existing store.
    pub fn init_global(config: StoreConfig) -> &'static PhotoStore {
        let mut config = Some(config);
        let store = GLOBAL_STORE.get_or_init(|| PhotoStore::new(config.take().unwrap_or_default()));
        if let Some(ignored) = config.filter(|c| c != store.config()) {
            tracing::warn!(
                "Photo store already set up with {}, ignoring {}",
                store.config.database_url,
                ignored.database_url
            );
        }
        store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the shared connection, opening the database and bringing the
    /// schema up to date the first time it is needed.
    pub async fn connection(&self) -> Result<DatabaseConnection> {
        let mut guard = self.connection.lock().await;
        if let Some(db) = guard.as_ref() {
            return Ok(db.clone());
        }

        if let Some(path) = self.config.database_path() {
            if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DbErr::Custom(format!("Unable to create directory {parent}: {e}"))
                })?;
            }
        }

        let db = Database::connect(self.config.connect_options())
            .await
            .inspect_err(|e| tracing::error!("{e:?}"))?;
        Migrator::up(&db, None).await?;
        tracing::info!("Photo database ready at {}", self.config.database_url);

        *guard = Some(db.clone());
        Ok(db)
    }

    /// Release the connection. The next operation opens a new one.
    pub async fn close(&self) -> Result<()> {
        let db = self.connection.lock().await.take();
        if let Some(db) = db {
            db.close().await?;
            tracing::debug!("Photo database closed");
        }
        Ok(())
    }

    /// Save a new photo, returning the id assigned to it.
    #[tracing::instrument(name = "Saving photo", skip_all, fields(bytes = new_photo.blob.len()))]
    pub async fn create(&self, new_photo: NewPhoto) -> Result<i64> {
        let db = self.connection().await?;
        let model = new_photo.into_active_model(OffsetDateTime::now_utc());
        let result = photo::Entity::insert(model)
            .exec(&db)
            .await
            .inspect_err(|e| tracing::error!("{e:?}"))?;
        tracing::debug!("Saved photo {}", result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// All photos, oldest first.
    #[tracing::instrument(name = "Querying all photos", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<photo::Model>> {
        let db = self.connection().await?;
        Ok(photo::Entity::find()
            .order_by_asc(photo::Column::Timestamp)
            .order_by_asc(photo::Column::Id)
            .all(&db)
            .await?)
    }

    #[tracing::instrument(name = "Querying photo", skip(self))]
    pub async fn get(&self, id: i64) -> Result<photo::Model> {
        let db = self.connection().await?;
        photo::Entity::find_by_id(id)
            .one(&db)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn count(&self) -> Result<u64> {
        let db = self.connection().await?;
        Ok(photo::Entity::find().count(&db).await?)
    }

    /// Distinct group names in use, sorted.
    #[tracing::instrument(name = "Querying unique groups", skip(self))]
    pub async fn groups(&self) -> Result<Vec<String>> {
        let db = self.connection().await?;
        Ok(photo::Entity::find()
            .select_only()
            .column(photo::Column::Group)
            .filter(photo::Column::Group.is_not_null())
            .filter(photo::Column::Group.ne(""))
            .distinct()
            .order_by_asc(photo::Column::Group)
            .into_tuple::<String>()
            .all(&db)
            .await?)
    }

    /// Apply the supplied fields to a photo, leaving everything else alone.
    ///
    /// The change is written with a single `UPDATE .. WHERE id = ?`, so two
    /// updates to the same photo never lose each other's columns and an update
    /// racing a delete can't bring the photo back.
    #[tracing::instrument(name = "Updating photo", skip(self))]
    pub async fn update(&self, id: i64, changes: PhotoUpdate) -> Result<()> {
        let db = self.connection().await?;
        if changes.is_empty() {
            let exists = photo::Entity::find_by_id(id).count(&db).await? > 0;
            return if exists {
                Ok(())
            } else {
                Err(StoreError::NotFound(id))
            };
        }

        match changes.into_active_model(id).update(&db).await {
            Ok(_) => Ok(()),
            // The second case is the row disappearing between the update and
            // reading it back.
            Err(DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) => {
                tracing::warn!("Photo {id} not found for update");
                Err(StoreError::NotFound(id))
            }
            Err(e) => {
                tracing::error!("{e:?}");
                Err(e.into())
            }
        }
    }

    /// Permanently remove a photo.
    #[tracing::instrument(name = "Deleting photo", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let db = self.connection().await?;
        let result = photo::Entity::delete_by_id(id).exec(&db).await?;
        if result.rows_affected == 0 {
            tracing::warn!("Photo {id} not found for deletion");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStore")
            .field("database_url", &self.config.database_url)
            .finish()
    }
}

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::{Resource, ResourceStore, StoreError};

const COUNTERS: &str = "counters";
const DEFAULT_DATABASE: &str = "planetary";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await.map_err(backend)?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options).map_err(backend)?;

        let db = client.database(database_name(uri));

        // Test connection
        db.list_collection_names().await.map_err(backend)?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes carry the uniqueness guarantee, so any failure here
    /// aborts startup.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        log::info!("🔧 Creating database indexes...");

        for (collection, field) in [
            ("users", "id"),
            ("users", "email"),
            ("planets", "planet_id"),
            ("planets", "planet_name"),
        ] {
            let mut keys = Document::new();
            keys.insert(field, 1);

            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.collection::<Document>(collection)
                .create_index(index)
                .await
                .map_err(backend)?;

            log::info!("   ✅ Unique index ready: {}({})", collection, field);
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Atomically increments and returns the id sequence for `collection`.
    async fn next_id(&self, collection: &str) -> Result<i64, StoreError> {
        let counter = self
            .collection::<Document>(COUNTERS)
            .find_one_and_update(doc! { "_id": collection }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("id counter for {} missing", collection)))?;

        counter
            .get_i64("seq")
            .map_err(|e| StoreError::Backend(format!("invalid id counter for {}: {}", collection, e)))
    }
}

/// Database name from the URI path, e.g. `mongodb://host:27017/planetary?retryWrites=true`.
fn database_name(uri: &str) -> &str {
    let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    rest.split_once('/')
        .and_then(|(_, path)| path.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE)
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

fn write_error<T: Resource>(err: mongodb::error::Error, entity: &T) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::DuplicateKey {
            field: T::UNIQUE_FIELD,
            value: entity.unique_value().to_string(),
        }
    } else {
        backend(err)
    }
}

fn id_filter<T: Resource>(id: i64) -> Document {
    let mut filter = Document::new();
    filter.insert(T::ID_FIELD, id);
    filter
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for MongoDB {
    async fn create(&self, mut entity: T) -> Result<i64, StoreError> {
        let id = self.next_id(T::COLLECTION).await?;
        entity.set_id(id);

        self.collection::<T>(T::COLLECTION)
            .insert_one(&entity)
            .await
            .map_err(|e| write_error(e, &entity))?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<T, StoreError> {
        self.collection::<T>(T::COLLECTION)
            .find_one(id_filter::<T>(id))
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            })
    }

    async fn find_by_unique_field(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        let mut filter = Document::new();
        filter.insert(field, value);

        self.collection::<T>(T::COLLECTION)
            .find_one(filter)
            .await
            .map_err(backend)
    }

    async fn update(&self, id: i64, mut entity: T) -> Result<(), StoreError> {
        entity.set_id(id);

        let result = self
            .collection::<T>(T::COLLECTION)
            .replace_one(id_filter::<T>(id), &entity)
            .await
            .map_err(|e| write_error(e, &entity))?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            });
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = self
            .collection::<T>(T::COLLECTION)
            .delete_one(id_filter::<T>(id))
            .await
            .map_err(backend)?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            });
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        let mut sort = Document::new();
        sort.insert(T::ID_FIELD, 1);

        self.collection::<T>(T::COLLECTION)
            .find(doc! {})
            .sort(sort)
            .await
            .map_err(backend)?
            .try_collect()
            .await
            .map_err(backend)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await.map(|_| ()).map_err(backend)
    }
}

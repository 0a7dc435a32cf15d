pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// A persisted entity keyed by a surrogate integer id, with exactly one
/// field that must be distinct across all records of its collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
    const ID_FIELD: &'static str;
    const UNIQUE_FIELD: &'static str;

    fn set_id(&mut self, id: i64);
    fn unique_value(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: i64 },

    #[error("{field} '{value}' already exists")]
    DuplicateKey { field: &'static str, value: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Keyed storage for one entity type. Uniqueness of `T::UNIQUE_FIELD` is
/// enforced atomically by every implementation, on both create and update.
#[async_trait]
pub trait ResourceStore<T: Resource>: Send + Sync {
    /// Assigns the next id to `entity`, persists it and returns the id.
    async fn create(&self, entity: T) -> Result<i64, StoreError>;

    async fn get(&self, id: i64) -> Result<T, StoreError>;

    async fn find_by_unique_field(&self, field: &str, value: &str) -> Result<Option<T>, StoreError>;

    /// Replaces every non-key field of record `id`.
    async fn update(&self, id: i64, entity: T) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// All records ordered by id.
    async fn list_all(&self) -> Result<Vec<T>, StoreError>;

    /// Succeeds when the backend is reachable and usable.
    async fn ping(&self) -> Result<(), StoreError>;
}

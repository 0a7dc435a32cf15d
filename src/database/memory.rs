use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{Resource, ResourceStore, StoreError};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

/// In-process store used for local development and tests.
///
/// Each table sits behind a single `RwLock`; the uniqueness check and the
/// write happen under the same write guard, so concurrent creates with the
/// same unique value cannot both succeed.
pub struct MemoryStore<T> {
    table: RwLock<Table<T>>,
}

impl<T: Resource> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Backend(format!("{} table lock poisoned", T::COLLECTION))
    }
}

impl<T: Resource> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn field_matches<T: Resource>(entity: &T, field: &str, value: &str) -> bool {
    match serde_json::to_value(entity) {
        Ok(json) => match json.get(field) {
            Some(serde_json::Value::String(s)) => s == value,
            Some(other) => other.to_string() == value,
            None => false,
        },
        Err(_) => false,
    }
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for MemoryStore<T> {
    async fn create(&self, mut entity: T) -> Result<i64, StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;

        if table.rows.values().any(|row| row.unique_value() == entity.unique_value()) {
            return Err(StoreError::DuplicateKey {
                field: T::UNIQUE_FIELD,
                value: entity.unique_value().to_string(),
            });
        }

        let id = table.next_id;
        table.next_id += 1;
        entity.set_id(id);
        table.rows.insert(id, entity);

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<T, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound {
            collection: T::COLLECTION,
            id,
        })
    }

    async fn find_by_unique_field(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table
            .rows
            .values()
            .find(|row| field_matches(*row, field, value))
            .cloned())
    }

    async fn update(&self, id: i64, mut entity: T) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;

        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            });
        }

        let collides = table
            .rows
            .iter()
            .any(|(row_id, row)| *row_id != id && row.unique_value() == entity.unique_value());
        if collides {
            return Err(StoreError::DuplicateKey {
                field: T::UNIQUE_FIELD,
                value: entity.unique_value().to_string(),
            });
        }

        entity.set_id(id);
        table.rows.insert(id, entity);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            })
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.table.read().map(|_| ()).map_err(|_| Self::poisoned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Planet;
    use std::sync::Arc;

    fn planet(name: &str) -> Planet {
        Planet {
            planet_id: 0,
            planet_name: name.to_string(),
            planet_type: "Class M".to_string(),
            home_star: "Sol".to_string(),
            mass: 5.972e24,
            radius: 3959.0,
            distance: 92.96e6,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::<Planet>::new();

        assert_eq!(store.create(planet("Mercury")).await.unwrap(), 1);
        assert_eq!(store.create(planet("Venus")).await.unwrap(), 2);

        let venus = store.get(2).await.unwrap();
        assert_eq!(venus.planet_id, 2);
        assert_eq!(venus.planet_name, "Venus");
    }

    #[tokio::test]
    async fn test_duplicate_unique_field_rejected() {
        let store = MemoryStore::<Planet>::new();
        store.create(planet("Earth")).await.unwrap();

        let err = store.create(planet("Earth")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: "planet_name", .. }));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_creates_single_winner() {
        let store = Arc::new(MemoryStore::<Planet>::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(planet("Kepler-22b")).await })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::DuplicateKey { .. }) => duplicates += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
    }

    #[tokio::test]
    async fn test_find_by_unique_field() {
        let store = MemoryStore::<Planet>::new();
        store.create(planet("Mars")).await.unwrap();

        let found = store.find_by_unique_field("planet_name", "Mars").await.unwrap();
        assert_eq!(found.map(|p| p.planet_id), Some(1));
        assert!(store.find_by_unique_field("planet_name", "Pluto").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let store = MemoryStore::<Planet>::new();
        let id = store.create(planet("Mars")).await.unwrap();

        let mut replacement = planet("Red Planet");
        replacement.planet_id = 999;
        replacement.mass = 6.39e23;
        store.update(id, replacement).await.unwrap();

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.planet_id, id);
        assert_eq!(stored.planet_name, "Red Planet");
        assert_eq!(stored.mass, 6.39e23);
    }

    #[tokio::test]
    async fn test_update_onto_existing_name_rejected() {
        let store = MemoryStore::<Planet>::new();
        store.create(planet("Mars")).await.unwrap();
        let venus = store.create(planet("Venus")).await.unwrap();

        let err = store.update(venus, planet("Mars")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(store.get(venus).await.unwrap().planet_name, "Venus");
    }

    #[tokio::test]
    async fn test_missing_ids_report_not_found() {
        let store = MemoryStore::<Planet>::new();

        assert!(matches!(store.get(42).await, Err(StoreError::NotFound { id: 42, .. })));
        assert!(matches!(store.update(42, planet("X")).await, Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete(42).await, Err(StoreError::NotFound { .. })));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryStore::<Planet>::new();
        let id = store.create(planet("Pluto")).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        // ids are not reused
        assert_eq!(store.create(planet("Pluto")).await.unwrap(), id + 1);
    }
}

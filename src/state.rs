use std::sync::Arc;

use crate::database::{MemoryStore, MongoDB, ResourceStore};
use crate::models::{Planet, User};
use crate::services::notification_service::NotificationGateway;
use crate::services::token_service::TokenService;

/// Dependencies shared by every request handler. Built once in `main` and
/// handed to actix as `web::Data<AppState>`.
pub struct AppState {
    /// Name of the storage backend, reported by `/health`.
    pub backend: &'static str,
    pub planets: Arc<dyn ResourceStore<Planet>>,
    pub users: Arc<dyn ResourceStore<User>>,
    pub tokens: TokenService,
    pub notifier: Arc<dyn NotificationGateway>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn with_mongo(
        db: MongoDB,
        tokens: TokenService,
        notifier: Arc<dyn NotificationGateway>,
        bcrypt_cost: u32,
    ) -> Self {
        let db = Arc::new(db);
        Self {
            backend: "mongodb",
            planets: db.clone(),
            users: db,
            tokens,
            notifier,
            bcrypt_cost,
        }
    }

    pub fn in_memory(tokens: TokenService, notifier: Arc<dyn NotificationGateway>, bcrypt_cost: u32) -> Self {
        Self {
            backend: "memory",
            planets: Arc::new(MemoryStore::<Planet>::new()),
            users: Arc::new(MemoryStore::<User>::new()),
            tokens,
            notifier,
            bcrypt_cost,
        }
    }
}

//! Handles shared by every request handler.

use mongodb::Database;
use std::sync::Arc;

use crate::db::models::{BloodRequest, ContactMessage, Donor, Record};
use crate::db::mongo::MongoCollection;
use crate::db::Repository;
use crate::error::StartupError;

/// Cloned into each handler by axum; clones share the collections.
#[derive(Clone)]
pub struct AppState {
    pub donors: Repository<Donor>,
    pub requests: Repository<BloodRequest>,
    pub messages: Repository<ContactMessage>,
}

impl AppState {
    /// Wire the three collections to `database` and ensure their indexes.
    pub async fn from_database(database: &Database) -> Result<Self, StartupError> {
        Ok(Self {
            donors: mongo_repository(database).await?,
            requests: mongo_repository(database).await?,
            messages: mongo_repository(database).await?,
        })
    }
}

async fn mongo_repository<T: Record>(database: &Database) -> Result<Repository<T>, StartupError> {
    let collection = MongoCollection::<T>::new(database);
    collection
        .setup_collection()
        .await
        .map_err(|source| StartupError::Collection {
            collection: T::COLLECTION,
            source,
        })?;
    tracing::debug!(collection = T::COLLECTION, "collection ready");
    Ok(Repository::new(Arc::new(collection)))
}

#[cfg(test)]
impl AppState {
    pub fn in_memory() -> Self {
        use crate::db::memory::MemoryCollection;
        Self {
            donors: Repository::new(Arc::new(MemoryCollection::<Donor>::default())),
            requests: Repository::new(Arc::new(MemoryCollection::<BloodRequest>::default())),
            messages: Repository::new(Arc::new(MemoryCollection::<ContactMessage>::default())),
        }
    }

    /// State whose store is unreachable.
    pub fn unavailable() -> Self {
        use crate::db::memory::MemoryCollection;
        Self {
            donors: Repository::new(Arc::new(MemoryCollection::<Donor>::failing())),
            requests: Repository::new(Arc::new(MemoryCollection::<BloodRequest>::failing())),
            messages: Repository::new(Arc::new(MemoryCollection::<ContactMessage>::failing())),
        }
    }
}

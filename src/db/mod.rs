pub mod models;
pub mod mongo;
pub mod schema;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bson::DateTime;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use self::models::Record;
use self::schema::SchemaError;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Payload was refused by the document schema.
    #[error("validation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Insert and list operations over one collection.
#[async_trait]
pub trait DocumentCollection<T: Record>: Send + Sync {
    async fn insert_one(&self, record: &T) -> Result<(), StoreError>;

    /// Every document, newest `createdAt` first.
    async fn find_newest_first(&self) -> Result<Vec<T>, StoreError>;
}

/// Typed accessor handlers go through. Casting happens here so schema
/// failures come out as store errors rather than request errors.
pub struct Repository<T: Record> {
    collection: Arc<dyn DocumentCollection<T>>,
}

impl<T: Record> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(collection: Arc<dyn DocumentCollection<T>>) -> Self {
        Self { collection }
    }

    pub async fn create(&self, payload: &Map<String, Value>) -> Result<T, StoreError> {
        let record = T::from_payload(payload, DateTime::now())?;
        self.collection.insert_one(&record).await?;
        tracing::debug!(collection = T::COLLECTION, "document inserted");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.collection.find_newest_first().await
    }
}

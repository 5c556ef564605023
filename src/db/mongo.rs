use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::models::Record;
use super::{DocumentCollection, StoreError};
use crate::config::MongoConfig;

pub struct MongoCollection<T> {
    inner: Collection<T>,
}

impl<T: Record> MongoCollection<T> {
    pub fn new(database: &Database) -> Self {
        Self {
            inner: database.collection(T::COLLECTION),
        }
    }

    /// Descending `createdAt` index backing the list query.
    pub async fn setup_collection(&self) -> Result<(), mongodb::error::Error> {
        self.inner
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "createdAt": -1 })
                    .options(Some(
                        IndexOptions::builder()
                            .name(Some(format!("{}_created_at", T::COLLECTION)))
                            .build(),
                    ))
                    .build(),
                None,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<T: Record> DocumentCollection<T> for MongoCollection<T> {
    async fn insert_one(&self, record: &T) -> Result<(), StoreError> {
        self.inner.insert_one(record, None).await?;
        Ok(())
    }

    async fn find_newest_first(&self) -> Result<Vec<T>, StoreError> {
        // _id breaks ties between inserts within the same millisecond
        let options = FindOptions::builder().sort(doc! { "createdAt": -1, "_id": -1 }).build();
        let cursor = self.inner.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Open the client and confirm the server answers before handing out the
/// database. The connect timeout covers the whole handshake.
pub async fn connect(config: &MongoConfig) -> Result<Database, StoreError> {
    tracing::info!("Connecting to MongoDB...");

    let mut options = ClientOptions::parse(&config.uri).await?;
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.connect_timeout);
    options
        .app_name
        .get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());

    let client = Client::with_options(options)?;
    let database = client
        .default_database()
        .unwrap_or_else(|| client.database(&config.database_name));

    let ping = database.run_command(doc! { "ping": 1 }, None);
    tokio::time::timeout(config.connect_timeout, ping)
        .await
        .map_err(|_| StoreError::Timeout(config.connect_timeout))??;

    tracing::info!(database = %database.name(), "MongoDB connected");

    Ok(database)
}

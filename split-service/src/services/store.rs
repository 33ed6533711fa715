//! Persistence of split records.

use crate::models::Split;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, IndexModel,
};
use service_core::error::AppError;

/// Storage for split records. Records are append-only.
#[async_trait]
pub trait SplitStore: Send + Sync {
    /// Durably writes one record as a single insert.
    async fn create(&self, split: Split) -> Result<(), AppError>;

    /// Every record, most recent `createdAt` first. Ties are unordered.
    async fn list_all(&self) -> Result<Vec<Split>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoSplitStore {
    client: MongoClient,
    splits: Collection<Split>,
}

impl MongoSplitStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let splits = client.database(database).collection(collection);
        Ok(Self { client, splits })
    }

    /// Creates the descending `createdAt` index backing `list_all`.
    ///
    /// This is the first round trip to the server, so an unreachable store
    /// surfaces here.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.splits
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create createdAt index on splits collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on splits.createdAt");

        Ok(())
    }
}

#[async_trait]
impl SplitStore for MongoSplitStore {
    async fn create(&self, split: Split) -> Result<(), AppError> {
        self.splits.insert_one(split, None).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Split>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self.splits.find(None, Some(options)).await?;
        let splits: Vec<Split> = cursor.try_collect().await?;
        Ok(splits)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

use crate::models::Split;
use crate::services::store::SplitStore;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local split storage for development runs and tests.
///
/// `set_available(false)` makes every call fail the way an unreachable
/// database would.
#[derive(Clone, Default)]
pub struct InMemorySplitStore {
    splits: Arc<RwLock<Vec<Split>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemorySplitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_available(false);
        store
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.splits.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory split store is unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SplitStore for InMemorySplitStore {
    async fn create(&self, mut split: Split) -> Result<(), AppError> {
        self.ensure_available()?;
        split.id.get_or_insert_with(ObjectId::new);
        self.splits.write().await.push(split);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Split>, AppError> {
        self.ensure_available()?;
        let mut splits = self.splits.read().await.clone();
        splits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(splits)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.ensure_available()
    }
}

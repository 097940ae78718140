use crate::models::{Dataset, PropertyRecord};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of point-in-time listing snapshots.
///
/// A query reads exactly one snapshot, so its median pass and its ranking
/// pass see the same records even if the store is refreshed meanwhile.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Current snapshot of one dataset
    async fn snapshot(&self, dataset: Dataset) -> Result<Arc<[PropertyRecord]>>;

    /// Name used in logs
    fn store_name(&self) -> &'static str;
}

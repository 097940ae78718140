use crate::models::{Dataset, PropertyRecord};
use crate::store::traits::ListingStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// On-disk snapshot layout: both datasets in one JSON document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub rental: Vec<PropertyRecord>,
    #[serde(default)]
    pub sold: Vec<PropertyRecord>,
}

/// In-memory listing store holding one immutable snapshot per dataset
pub struct InMemoryStore {
    rental: RwLock<Arc<[PropertyRecord]>>,
    sold: RwLock<Arc<[PropertyRecord]>>,
}

impl InMemoryStore {
    /// Build a store from validated collections
    pub fn new(rental: Vec<PropertyRecord>, sold: Vec<PropertyRecord>) -> Result<Self> {
        check_collection(Dataset::Rental, &rental)?;
        check_collection(Dataset::Sold, &sold)?;

        info!(
            "Listing store ready: {} rental, {} sold",
            rental.len(),
            sold.len()
        );

        Ok(Self {
            rental: RwLock::new(rental.into()),
            sold: RwLock::new(sold.into()),
        })
    }

    /// Load both datasets from a JSON snapshot file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading listing snapshot from {}", path.display());

        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
        let file: SnapshotFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot file {}", path.display()))?;

        Self::new(file.rental, file.sold)
    }

    /// Swap in a new snapshot for one dataset.
    ///
    /// Queries already holding the previous snapshot keep reading it.
    pub async fn replace(&self, dataset: Dataset, records: Vec<PropertyRecord>) -> Result<()> {
        check_collection(dataset, &records)?;
        let count = records.len();
        *self.slot(dataset).write().await = records.into();
        info!("Replaced {} snapshot with {} listings", dataset, count);
        Ok(())
    }

    fn slot(&self, dataset: Dataset) -> &RwLock<Arc<[PropertyRecord]>> {
        match dataset {
            Dataset::Rental => &self.rental,
            Dataset::Sold => &self.sold,
        }
    }
}

#[async_trait]
impl ListingStore for InMemoryStore {
    async fn snapshot(&self, dataset: Dataset) -> Result<Arc<[PropertyRecord]>> {
        Ok(Arc::clone(&*self.slot(dataset).read().await))
    }

    fn store_name(&self) -> &'static str {
        "in-memory"
    }
}

fn check_collection(dataset: Dataset, records: &[PropertyRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if let Err(reason) = record.validate() {
            anyhow::bail!("Invalid {} listing: {}", dataset, reason);
        }
        if !seen.insert(record.id) {
            anyhow::bail!("Duplicate {} listing id {}", dataset, record.id);
        }
    }
    Ok(())
}

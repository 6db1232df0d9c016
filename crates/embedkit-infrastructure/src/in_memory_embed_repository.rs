//! In-memory EmbedRepository implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use embedkit_core::embed::EmbedDocument;
use embedkit_core::error::Result;
use embedkit_core::store::{EmbedRepository, Identifier, SaveOutcome, StoredRecord};

/// Volatile repository for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct InMemoryEmbedRepository {
    partitions: RwLock<HashMap<String, BTreeMap<Identifier, StoredRecord>>>,
}

impl InMemoryEmbedRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmbedRepository for InMemoryEmbedRepository {
    async fn save(
        &self,
        partition: &str,
        id: &Identifier,
        document: EmbedDocument,
    ) -> Result<SaveOutcome> {
        let mut partitions = self.partitions.write().await;
        let records = partitions.entry(partition.to_string()).or_default();

        let (record, outcome) = match records.get(id) {
            Some(existing) => (existing.overwritten_with(document), SaveOutcome::Overwritten),
            None => (StoredRecord::new(id.clone(), document), SaveOutcome::Created),
        };
        records.insert(id.clone(), record);
        Ok(outcome)
    }

    async fn get(&self, partition: &str, id: &Identifier) -> Result<Option<StoredRecord>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn list(&self, partition: &str) -> Result<Vec<Identifier>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, partition: &str, id: &Identifier) -> Result<bool> {
        let mut partitions = self.partitions.write().await;
        Ok(partitions
            .get_mut(partition)
            .and_then(|records| records.remove(id))
            .is_some())
    }

    async fn list_records(&self, partition: &str) -> Result<Vec<StoredRecord>> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }
}

//! Embed repository trait.

use async_trait::async_trait;

use super::{Identifier, SaveOutcome, StoredRecord};
use crate::embed::EmbedDocument;
use crate::error::Result;

/// Repository for named embed documents.
///
/// Every operation is scoped to a partition; identifiers are unique within
/// a partition and invisible outside it. Implementations must apply each
/// save or delete atomically per identifier: a concurrent reader sees either
/// the old record or the new one, never a mix.
#[async_trait]
pub trait EmbedRepository: Send + Sync {
    /// Inserts or replaces the document stored under `id`. Last writer wins.
    async fn save(
        &self,
        partition: &str,
        id: &Identifier,
        document: EmbedDocument,
    ) -> Result<SaveOutcome>;

    /// Gets the record stored under `id`, if any.
    async fn get(&self, partition: &str, id: &Identifier) -> Result<Option<StoredRecord>>;

    /// Lists identifiers in lexical order.
    async fn list(&self, partition: &str) -> Result<Vec<Identifier>>;

    /// Removes the record under `id`. Returns `false` if nothing was stored.
    async fn delete(&self, partition: &str, id: &Identifier) -> Result<bool>;

    /// Gets every record in the partition, in the same order as [`list`](Self::list).
    async fn list_records(&self, partition: &str) -> Result<Vec<StoredRecord>> {
        let mut records = Vec::new();
        for id in self.list(partition).await? {
            if let Some(record) = self.get(partition, &id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

//! File-backed EmbedRepository implementation.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── partitions/
//!     ├── <partition-1>.json
//!     └── <partition-2>.json
//! ```
//!
//! Each partition is one versioned [`PartitionFileV1_0_0`](crate::dto::PartitionFileV1_0_0), loaded through
//! the partition migrator. Writers are serialized by an in-process mutex plus
//! the file lock held by [`AtomicFile::update`]; readers load the last fully
//! renamed file without locking.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use embedkit_core::embed::EmbedDocument;
use embedkit_core::error::{EmbedError, Result};
use embedkit_core::store::{EmbedRepository, Identifier, Partition, SaveOutcome, StoredRecord};

use crate::dto::{PARTITION_ENTITY, create_partition_migrator};
use crate::paths::EmbedkitPaths;
use crate::storage::AtomicFile;

const PARTITIONS_DIR: &str = "partitions";

pub struct JsonEmbedRepository {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonEmbedRepository {
    /// Creates a repository at the default data directory.
    pub async fn new() -> Result<Self> {
        let base_dir = EmbedkitPaths::data_dir()?;
        Self::new_with_base(base_dir).await
    }

    /// Creates a repository rooted at `base_dir`, creating it if needed.
    pub async fn new_with_base(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        tokio::fs::create_dir_all(base_dir.join(PARTITIONS_DIR))
            .await
            .map_err(|e| EmbedError::io(format!("Failed to create base directory: {}", e)))?;

        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn partition_file(&self, partition: &str) -> Result<AtomicFile<serde_json::Value>> {
        validate_partition(partition)?;
        let path = self
            .base_dir
            .join(PARTITIONS_DIR)
            .join(format!("{partition}.json"));
        Ok(AtomicFile::new(path))
    }

    async fn load_partition(&self, partition: &str) -> Result<Partition> {
        let file = self.partition_file(partition)?;
        run_blocking(move || match file.load()? {
            Some(raw) => decode_partition(raw),
            None => Ok(Partition::default()),
        })
        .await
    }

    /// Applies `f` to the stored partition under the write locks.
    async fn modify_partition<R, F>(&self, partition: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Partition) -> R + Send + 'static,
        R: Send + 'static,
    {
        let file = self.partition_file(partition)?;
        let _guard = self.write_lock.lock().await;

        run_blocking(move || {
            let empty = encode_partition(&Partition::default())?;
            file.update(empty, |raw| {
                let mut stored = decode_partition(raw.take())?;
                let result = f(&mut stored);
                *raw = encode_partition(&stored)?;
                Ok::<_, EmbedError>(result)
            })
        })
        .await
    }
}

/// Partition names become file names, so only `[A-Za-z0-9_-]` is allowed.
fn validate_partition(partition: &str) -> Result<()> {
    let valid = !partition.is_empty()
        && partition
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(EmbedError::invalid_identifier(partition))
    }
}

fn decode_partition(raw: serde_json::Value) -> Result<Partition> {
    let migrator = create_partition_migrator()?;
    let partition: Partition = migrator.load_flat_from(PARTITION_ENTITY, raw)?;
    Ok(partition)
}

fn encode_partition(partition: &Partition) -> Result<serde_json::Value> {
    let migrator = create_partition_migrator()?;
    let json_str = migrator.save_domain_flat(PARTITION_ENTITY, partition)?;
    Ok(serde_json::from_str(&json_str)?)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EmbedError::internal(format!("Storage task failed: {}", e)))?
}

#[async_trait]
impl EmbedRepository for JsonEmbedRepository {
    async fn save(
        &self,
        partition: &str,
        id: &Identifier,
        document: EmbedDocument,
    ) -> Result<SaveOutcome> {
        let key = id.clone();
        let outcome = self
            .modify_partition(partition, move |stored| stored.save(&key, document))
            .await?;

        tracing::info!(partition, id = %id, ?outcome, "Saved embed");
        Ok(outcome)
    }

    async fn get(&self, partition: &str, id: &Identifier) -> Result<Option<StoredRecord>> {
        let stored = self.load_partition(partition).await?;
        Ok(stored.get(id).cloned())
    }

    async fn list(&self, partition: &str) -> Result<Vec<Identifier>> {
        let stored = self.load_partition(partition).await?;
        Ok(stored.ids())
    }

    async fn delete(&self, partition: &str, id: &Identifier) -> Result<bool> {
        if !self.partition_file(partition)?.exists() {
            tracing::debug!(partition, id = %id, "Delete requested for missing embed");
            return Ok(false);
        }

        let key = id.clone();
        let removed = self
            .modify_partition(partition, move |stored| stored.remove(&key).is_some())
            .await?;

        if removed {
            tracing::info!(partition, id = %id, "Deleted embed");
        } else {
            tracing::debug!(partition, id = %id, "Delete requested for missing embed");
        }
        Ok(removed)
    }

    async fn list_records(&self, partition: &str) -> Result<Vec<StoredRecord>> {
        let stored = self.load_partition(partition).await?;
        Ok(stored.into_records())
    }
}

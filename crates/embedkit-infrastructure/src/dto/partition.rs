//! Partition file DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema, records sorted by id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigrationError, Migrator, Versioned};

use embedkit_core::embed::EmbedDocument;
use embedkit_core::store::{Identifier, Partition, StoredRecord};

/// Entity name of a partition file in the migrator.
pub const PARTITION_ENTITY: &str = "partition";

/// Stored record DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecordV1_0_0 {
    /// Normalized identifier
    pub id: Identifier,
    /// The document in its wire shape; re-validated on load
    pub document: EmbedDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredRecord> for StoredRecordV1_0_0 {
    fn from(record: &StoredRecord) -> Self {
        StoredRecordV1_0_0 {
            id: record.id.clone(),
            document: record.document.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<StoredRecordV1_0_0> for StoredRecord {
    fn from(dto: StoredRecordV1_0_0) -> Self {
        StoredRecord {
            id: dto.id,
            document: dto.document,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

/// Partition file DTO V1.0.0
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct PartitionFileV1_0_0 {
    #[serde(default)]
    pub records: Vec<StoredRecordV1_0_0>,
}

/// Convert PartitionFileV1_0_0 DTO to domain model
impl IntoDomain<Partition> for PartitionFileV1_0_0 {
    fn into_domain(self) -> Partition {
        Partition::from_records(self.records.into_iter().map(StoredRecord::from))
    }
}

/// Convert domain model to PartitionFileV1_0_0 DTO for persistence
impl FromDomain<Partition> for PartitionFileV1_0_0 {
    fn from_domain(partition: Partition) -> Self {
        PartitionFileV1_0_0 {
            records: partition
                .records()
                .iter()
                .map(StoredRecordV1_0_0::from)
                .collect(),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for partition files.
///
/// # Migration Path
///
/// - V1.0.0 → Partition
pub fn create_partition_migrator() -> Result<Migrator, MigrationError> {
    let mut migrator = Migrator::builder().build();

    let partition_path = Migrator::define(PARTITION_ENTITY)
        .from::<PartitionFileV1_0_0>()
        .into_with_save::<Partition>();

    migrator.register(partition_path)?;
    Ok(migrator)
}

//! Data Transfer Objects (DTOs) for persistence.
//!
//! Every persisted file is a versioned DTO loaded through a
//! `version_migrate::Migrator`, so older layouts migrate into the current
//! domain model on read. The DTOs stay private to the infrastructure layer.

mod config;
mod partition;

pub use config::{CONFIG_ENTITY, EmbedManagerConfigV1_0_0, create_config_migrator};
pub use partition::{
    PARTITION_ENTITY, PartitionFileV1_0_0, StoredRecordV1_0_0, create_partition_migrator,
};

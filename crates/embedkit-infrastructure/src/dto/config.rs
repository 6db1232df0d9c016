//! Configuration file DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: permissions, paginator, converter and storage sections

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigrationError, Migrator, Versioned};

use embedkit_core::config::{
    ConverterConfig, EmbedManagerConfig, PaginatorConfig, PermissionConfig, StorageConfig,
};

/// Entity name of the configuration in `config.toml`.
pub const CONFIG_ENTITY: &str = "config";

/// Configuration DTO V1.0.0
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct EmbedManagerConfigV1_0_0 {
    #[serde(default)]
    pub permissions: PermissionConfig,
    #[serde(default)]
    pub paginator: PaginatorConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl IntoDomain<EmbedManagerConfig> for EmbedManagerConfigV1_0_0 {
    fn into_domain(self) -> EmbedManagerConfig {
        EmbedManagerConfig {
            permissions: self.permissions,
            paginator: self.paginator,
            converter: self.converter,
            storage: self.storage,
        }
    }
}

impl FromDomain<EmbedManagerConfig> for EmbedManagerConfigV1_0_0 {
    fn from_domain(config: EmbedManagerConfig) -> Self {
        EmbedManagerConfigV1_0_0 {
            permissions: config.permissions,
            paginator: config.paginator,
            converter: config.converter,
            storage: config.storage,
        }
    }
}

/// Creates a Migrator for the configuration file.
pub fn create_config_migrator() -> Result<Migrator, MigrationError> {
    let mut migrator = Migrator::builder().build();

    let config_path = Migrator::define(CONFIG_ENTITY)
        .from::<EmbedManagerConfigV1_0_0>()
        .into_with_save::<EmbedManagerConfig>();

    migrator.register(config_path)?;
    Ok(migrator)
}

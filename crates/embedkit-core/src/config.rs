//! Configuration model for embedkit.
//!
//! Loaded from `config.toml` by the infrastructure crate as the versioned
//! `config` entity; every section and field has a default so a partial or
//! missing file is fine.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

use crate::convert::{Converter, DEFAULT_EXTENSIONS};
use crate::pager::PaginatorOptions;
use crate::permission::PermissionLevel;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Queryable)]
#[queryable(entity = "config")]
#[serde(default)]
pub struct EmbedManagerConfig {
    pub permissions: PermissionConfig,
    pub paginator: PaginatorConfig,
    pub converter: ConverterConfig,
    pub storage: StorageConfig,
}

/// Minimum tiers for store-mutating and read-only operations.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PermissionConfig {
    pub mutate: PermissionLevel,
    pub view: PermissionLevel,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            mutate: PermissionLevel::Moderator,
            view: PermissionLevel::Moderator,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PaginatorConfig {
    pub idle_timeout_secs: u64,
    pub debounce_ms: u64,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 180,
            debounce_ms: 250,
        }
    }
}

impl PaginatorConfig {
    pub fn options(&self) -> PaginatorOptions {
        PaginatorOptions {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
    pub accepted_extensions: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ConverterConfig {
    pub fn converter(&self) -> Converter {
        Converter::new(self.accepted_extensions.iter().cloned())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for partition files; the platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub default_partition: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_partition: "config".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EmbedManagerConfig = toml::from_str(
            r#"
            [permissions]
            mutate = "administrator"

            [paginator]
            idle_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.permissions.mutate, PermissionLevel::Administrator);
        assert_eq!(config.permissions.view, PermissionLevel::Moderator);
        assert_eq!(config.paginator.options().idle_timeout, Duration::from_secs(30));
        assert_eq!(config.paginator.debounce_ms, 250);
        assert_eq!(config.converter.accepted_extensions, vec!["json", "txt"]);
        assert_eq!(config.storage.default_partition, "config");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: EmbedManagerConfig = toml::from_str("").unwrap();
        assert_eq!(config, EmbedManagerConfig::default());
    }
}

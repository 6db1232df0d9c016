//! Configuration service implementation.
//!
//! Loads [`EmbedManagerConfig`] from `config.toml` through a
//! `version_migrate::FileStorage`, writing a default entry when none exists,
//! and caches the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use embedkit_core::config::EmbedManagerConfig;
use embedkit_core::error::Result;

use crate::dto::{CONFIG_ENTITY, create_config_migrator};
use crate::paths::EmbedkitPaths;

/// Configuration service that loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<EmbedManagerConfig>>>,
}

impl ConfigService {
    /// Creates a service for the default location (or `EMBEDKIT_CONFIG`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(EmbedkitPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<EmbedManagerConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Persists `config` and replaces the cached copy.
    pub fn save_config(&self, config: &EmbedManagerConfig) -> Result<()> {
        let mut storage = self.open_storage()?;
        storage.update_and_save(CONFIG_ENTITY, vec![config.clone()])?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn open_storage(&self) -> Result<FileStorage> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        Ok(FileStorage::new(
            self.path.clone(),
            create_config_migrator()?,
            strategy,
        )?)
    }

    fn load_config(&self) -> Result<EmbedManagerConfig> {
        let mut storage = self.open_storage()?;
        let configs: Vec<EmbedManagerConfig> = storage.query(CONFIG_ENTITY)?;

        match configs.into_iter().next() {
            Some(config) => Ok(config),
            None => {
                let config = EmbedManagerConfig::default();
                storage.update_and_save(CONFIG_ENTITY, vec![config.clone()])?;
                tracing::info!(path = %self.path.display(), "Created default configuration");
                Ok(config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedkit_core::PermissionLevel;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("embedkit/config.toml");
        let service = ConfigService::with_path(&path);

        let config = service.get_config().unwrap();

        assert_eq!(config, EmbedManagerConfig::default());
        assert!(path.exists());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("1.0.0"));

        let reopened = ConfigService::with_path(&path).get_config().unwrap();
        assert_eq!(reopened, EmbedManagerConfig::default());
    }

    #[test]
    fn test_saved_config_is_read_back_and_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let reader = ConfigService::with_path(&path);
        let writer = ConfigService::with_path(&path);

        let mut config = reader.get_config().unwrap();
        assert_eq!(config.permissions.view, PermissionLevel::Moderator);

        config.permissions.view = PermissionLevel::Regular;
        config.paginator.idle_timeout_secs = 60;
        writer.save_config(&config).unwrap();
        assert_eq!(writer.get_config().unwrap(), config);

        assert_eq!(
            reader.get_config().unwrap().permissions.view,
            PermissionLevel::Moderator
        );

        reader.invalidate_cache();
        let reloaded = reader.get_config().unwrap();
        assert_eq!(reloaded.permissions.view, PermissionLevel::Regular);
        assert_eq!(reloaded.paginator.idle_timeout_secs, 60);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[paginator\nidle_timeout_secs = ").unwrap();

        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(err.is_storage());
    }
}

//! Path resolution for embedkit configuration and data files.
//!
//! ```text
//! ~/.config/embedkit/          # Config directory
//! └── config.toml              # EmbedManagerConfig
//!
//! ~/.local/share/embedkit/     # Data directory (or [storage].data_dir)
//! └── partitions/
//!     ├── config.json          # One file per partition
//!     └── <partition>.json
//! ```

use std::path::PathBuf;

use thiserror::Error;

use embedkit_core::EmbedError;
use embedkit_core::config::StorageConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "EMBEDKIT_CONFIG";

const APP_DIR: &str = "embedkit";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for EmbedError {
    fn from(err: PathError) -> Self {
        EmbedError::config(err.to_string())
    }
}

pub struct EmbedkitPaths;

impl EmbedkitPaths {
    /// Returns the config directory (e.g. `~/.config/embedkit/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/embedkit/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the config file path, honouring `EMBEDKIT_CONFIG`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolves the repository base directory for a storage config.
    pub fn storage_dir(storage: &StorageConfig) -> Result<PathBuf, PathError> {
        match &storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::data_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/srv/embeds")),
            ..StorageConfig::default()
        };
        assert_eq!(
            EmbedkitPaths::storage_dir(&storage).unwrap(),
            PathBuf::from("/srv/embeds")
        );
    }
}

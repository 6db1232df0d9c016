//! Error types for embedkit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::ConvertError;
use crate::pager::PagerError;
use crate::permission::PermissionLevel;

/// A shared error type for the whole embedkit workspace.
///
/// Conversion and paginator failures keep their own enums and are folded in
/// through `From`, so callers can still match on the precise reason.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum EmbedError {
    /// The input could not be converted into an embed
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// A paginator transition was rejected
    #[error(transparent)]
    Pager(#[from] PagerError),

    /// A document name or partition is empty or malformed
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// The invoking actor is below the required permission level
    #[error("Permission denied: requires {required}, you have {actual}")]
    PermissionDenied {
        required: PermissionLevel,
        actual: PermissionLevel,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Underlying persistence is unavailable or inconsistent
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// A persisted file could not be migrated to the current schema
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host adapter failed to deliver or update a message
    #[error("Host error: {0}")]
    Host(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EmbedError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidIdentifier error
    pub fn invalid_identifier(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier(raw.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidIdentifier error
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_))
    }

    /// Check if this is a conversion error
    pub fn is_convert(&self) -> bool {
        matches!(self, Self::Convert(_))
    }

    /// Check if this error is an authorization denial.
    ///
    /// Returns true for:
    /// - `PermissionDenied` (tier too low for the operation)
    /// - `Pager(NotAuthorized)` (someone else's paginator)
    pub fn is_authorization(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } => true,
            Self::Pager(err) => err.is_not_authorized(),
            _ => false,
        }
    }

    /// Check if this is a storage-layer failure
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io { .. } | Self::Serialization { .. } | Self::Migration(_)
        )
    }

    /// Check if the host should drop this error without telling the user.
    ///
    /// Session races (closed session, stale or debounced events) are expected
    /// and never surfaced.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Pager(err) if err.is_silent())
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for EmbedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for EmbedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EmbedError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for EmbedError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for EmbedError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::TomlParseError(_) | MigrationError::TomlSerializeError(_) => {
                Self::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, EmbedError>`.
pub type Result<T> = std::result::Result<T, EmbedError>;

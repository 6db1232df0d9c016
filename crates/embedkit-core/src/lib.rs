//! Domain core for embedkit.
//!
//! - [`embed`]: the validated embed document model
//! - [`convert`]: turning raw text, files and delivered messages into documents
//! - [`store`]: the named document repository contract
//! - [`pager`]: the interactive paginator state machine

pub mod config;
pub mod convert;
pub mod embed;
pub mod error;
pub mod pager;
pub mod permission;
pub mod store;

// Re-export common error type
pub use error::{EmbedError, Result};
pub use permission::PermissionLevel;

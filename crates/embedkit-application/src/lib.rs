//! Application layer for embedkit.
//!
//! Use cases ([`EmbedManager`]) coordinate the core model, the repository and
//! the host adapter; paginator sessions run as one task each.

pub mod embed_manager;
pub mod host;
pub mod logging;
pub mod pager;

pub use embed_manager::EmbedManager;
pub use host::{ChannelId, Invoker, MessageHandle, RenderSink};
pub use pager::{OpenedPaginator, PaginatorRegistry};

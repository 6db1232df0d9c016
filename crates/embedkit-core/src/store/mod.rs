//! Named document store contract.
//!
//! Documents are stored per partition under a normalized [`Identifier`].
//! Implementations live in the infrastructure crate.

pub mod identifier;
pub mod model;
pub mod repository;

pub use identifier::Identifier;
pub use model::{Partition, SaveOutcome, StoredRecord};
pub use repository::EmbedRepository;

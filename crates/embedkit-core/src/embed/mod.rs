//! Canonical embed document model.
//!
//! An [`EmbedDocument`] is the validated form of an embed; an [`EmbedDraft`]
//! is the same content before validation, shaped like the platform's JSON.

pub mod limits;
pub mod model;
pub mod text;

pub use model::{EmbedAuthor, EmbedDocument, EmbedDraft, EmbedField, EmbedFooter, EmbedMedia};
pub use text::{paginate_text, source_pages};

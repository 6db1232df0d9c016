//! Conversion pipeline: untyped input in, validated [`EmbedDocument`] out.
//!
//! Three sources are supported (see [`ConversionSource`]): an embed copied from
//! a delivered message, an uploaded `.json`/`.txt` file, and raw text. Text is
//! read as JSON when it starts with `{` or `[` and as the line shorthand
//! otherwise. The converter never performs I/O; the host hands in bytes it
//! already fetched.

pub mod error;
mod json;
mod shorthand;
pub mod source;

pub use error::{ConvertError, ErrorCategory};
pub use source::{Attachment, ConversionSource, EmbedKind, RenderedEmbed};

use crate::embed::EmbedDocument;

/// File extensions read when no configuration says otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["json", "txt"];

const UTF8_BOM: char = '\u{feff}';

/// Converts input sources into validated embed documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    accepted_extensions: Vec<String>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()))
    }
}

impl Converter {
    /// Creates a converter reading attachments with the given extensions.
    ///
    /// Extensions are matched case-insensitively; a leading dot is ignored.
    pub fn new(accepted_extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            accepted_extensions: accepted_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.accepted_extensions
    }

    /// Runs the pipeline for any source.
    pub fn convert(&self, source: ConversionSource) -> Result<EmbedDocument, ConvertError> {
        match source {
            ConversionSource::Message { embeds, index } => self.from_message(&embeds, index),
            ConversionSource::File(attachment) => self.from_file(attachment.as_ref()),
            ConversionSource::Text(text) => self.from_text(&text),
        }
    }

    /// Copies the embed at `index` from a delivered message.
    ///
    /// The index is clamped into `[0, len - 1]`, so a stale index resolves to
    /// the nearest embed instead of failing.
    pub fn from_message(
        &self,
        embeds: &[RenderedEmbed],
        index: usize,
    ) -> Result<EmbedDocument, ConvertError> {
        let last = embeds.len().checked_sub(1).ok_or(ConvertError::NoEmbedsPresent)?;
        let embed = &embeds[index.min(last)];

        if embed.kind != EmbedKind::Rich {
            return Err(ConvertError::NotRichType {
                kind: embed.kind.to_string(),
            });
        }
        EmbedDocument::try_from(embed.content.clone())
    }

    /// Decodes an attachment and parses it as text.
    pub fn from_file(&self, attachment: Option<&Attachment>) -> Result<EmbedDocument, ConvertError> {
        let attachment = attachment.ok_or(ConvertError::NoAttachment)?;

        if !self.accepts(&attachment.filename) {
            return Err(ConvertError::UnsupportedExtension {
                filename: attachment.filename.clone(),
                accepted: self.accepted_extensions.clone(),
            });
        }

        let text = std::str::from_utf8(&attachment.bytes).map_err(|e| {
            ConvertError::EncodingError {
                message: e.to_string(),
            }
        })?;
        self.from_text(text)
    }

    /// Parses JSON or shorthand text.
    pub fn from_text(&self, text: &str) -> Result<EmbedDocument, ConvertError> {
        let body = strip_code_fence(text.trim_start_matches(UTF8_BOM).trim());
        if body.is_empty() {
            return Err(ConvertError::malformed("input is empty", None, None));
        }

        let draft = if body.starts_with('{') || body.starts_with('[') {
            json::parse_draft(body)?
        } else {
            shorthand::parse_draft(body)?
        };
        EmbedDocument::try_from(draft)
    }

    fn accepts(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.accepted_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")))
    }
}

/// Converts `source` with the default extension list.
pub fn convert(source: ConversionSource) -> Result<EmbedDocument, ConvertError> {
    Converter::default().convert(source)
}

/// Removes a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => {
            let untagged = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            if untagged.trim_start().starts_with(['{', '[']) {
                untagged
            } else {
                rest
            }
        }
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

//! Conversion failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The input source itself is unusable (missing, wrong kind, undecodable).
    Input,
    /// The input was read but does not describe a valid embed.
    Validation,
}

/// Why an input could not be turned into an [`EmbedDocument`](crate::embed::EmbedDocument).
///
/// Every variant is terminal for the invocation that produced it and is meant
/// to be shown to the operator verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvertError {
    /// The referenced message carries no embeds at all.
    #[error("That message has no embeds.")]
    NoEmbedsPresent,

    /// The selected embed is an auto-generated preview, not a rich embed.
    #[error("That is not a rich embed (found a `{kind}` embed).")]
    NotRichType { kind: String },

    /// A file source was requested but nothing was attached.
    #[error("No file was attached. Run the command again and attach an embed file.")]
    NoAttachment,

    /// The attachment's file name has an extension we do not read.
    #[error("Invalid file type `{filename}`. The file name must end with one of {}.", .accepted.join(", "))]
    UnsupportedExtension {
        filename: String,
        accepted: Vec<String>,
    },

    /// The attachment is not UTF-8 text.
    #[error("Failed to read embed file contents: {message}")]
    EncodingError { message: String },

    /// The text could not be parsed at all.
    #[error("Malformed input{}: {message}", location_suffix(.line, .column))]
    MalformedInput {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The text parsed but a member breaks the embed schema.
    #[error("Invalid `{field}`: {reason}")]
    SchemaViolation { field: String, reason: String },
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

impl ConvertError {
    /// Creates a SchemaViolation error
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a MalformedInput error
    pub fn malformed(message: impl Into<String>, line: Option<usize>, column: Option<usize>) -> Self {
        Self::MalformedInput {
            message: message.into(),
            line,
            column,
        }
    }

    /// Returns whether this failure concerns the input source or its content.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoEmbedsPresent
            | Self::NotRichType { .. }
            | Self::NoAttachment
            | Self::UnsupportedExtension { .. }
            | Self::EncodingError { .. } => ErrorCategory::Input,
            Self::MalformedInput { .. } | Self::SchemaViolation { .. } => {
                ErrorCategory::Validation
            }
        }
    }

    /// Check if this is a schema violation on the given field path
    pub fn is_schema_violation_on(&self, path: &str) -> bool {
        matches!(self, Self::SchemaViolation { field, .. } if field == path)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        let line = (err.line() > 0).then_some(err.line());
        let column = (err.column() > 0).then_some(err.column());
        Self::MalformedInput {
            message: err.to_string(),
            line,
            column,
        }
    }
}

//! Embed domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::limits::*;
use crate::convert::ConvertError;

/// Author block shown above the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Footer line shown below the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Image or thumbnail reference, `{"url": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedMedia {
    pub url: String,
}

/// A single name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Unvalidated embed content.
///
/// A draft mirrors the platform's embed JSON shape and may hold anything;
/// it only becomes an [`EmbedDocument`] through `EmbedDocument::try_from`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbedDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl EmbedDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_author(mut self, name: impl Into<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url: None,
            url: None,
        });
        self
    }

    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url: None,
        });
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField::new(name, value, inline));
        self
    }

    /// Validates the draft and freezes it into a document.
    pub fn build(self) -> Result<EmbedDocument, ConvertError> {
        EmbedDocument::try_from(self)
    }
}

/// A validated embed.
///
/// Construction always goes through validation, including deserialization,
/// so holding an `EmbedDocument` means every platform limit is satisfied.
/// Documents are immutable; use [`EmbedDocument::to_draft`] to derive an edited copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmbedDraft", into = "EmbedDraft")]
pub struct EmbedDocument {
    title: Option<String>,
    description: Option<String>,
    color: Option<u32>,
    author: Option<EmbedAuthor>,
    footer: Option<EmbedFooter>,
    image: Option<String>,
    thumbnail: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    fields: Vec<EmbedField>,
}

impl EmbedDocument {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn color(&self) -> Option<u32> {
        self.color
    }

    pub fn author(&self) -> Option<&EmbedAuthor> {
        self.author.as_ref()
    }

    pub fn footer(&self) -> Option<&EmbedFooter> {
        self.footer.as_ref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn fields(&self) -> &[EmbedField] {
        &self.fields
    }

    /// Returns an editable copy of this document's content.
    pub fn to_draft(&self) -> EmbedDraft {
        EmbedDraft::from(self.clone())
    }

    /// Combined character count of every text member counted against
    /// [`MAX_TOTAL_CHARS`].
    pub fn total_chars(&self) -> usize {
        total_chars(
            self.title.as_deref(),
            self.description.as_deref(),
            self.author.as_ref(),
            self.footer.as_ref(),
            &self.fields,
        )
    }

    /// Pretty JSON in the platform embed shape. Parsing it back yields an equal document.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<EmbedDraft> for EmbedDocument {
    type Error = ConvertError;

    fn try_from(draft: EmbedDraft) -> Result<Self, Self::Error> {
        validate(&draft)?;

        Ok(Self {
            title: draft.title,
            description: draft.description,
            color: draft.color,
            author: draft.author,
            footer: draft.footer,
            image: draft.image.map(|media| media.url),
            thumbnail: draft.thumbnail.map(|media| media.url),
            timestamp: draft.timestamp,
            fields: draft.fields,
        })
    }
}

impl From<EmbedDocument> for EmbedDraft {
    fn from(document: EmbedDocument) -> Self {
        Self {
            title: document.title,
            description: document.description,
            color: document.color,
            author: document.author,
            footer: document.footer,
            image: document.image.map(|url| EmbedMedia { url }),
            thumbnail: document.thumbnail.map(|url| EmbedMedia { url }),
            timestamp: document.timestamp,
            fields: document.fields,
        }
    }
}

fn total_chars(
    title: Option<&str>,
    description: Option<&str>,
    author: Option<&EmbedAuthor>,
    footer: Option<&EmbedFooter>,
    fields: &[EmbedField],
) -> usize {
    let count = |s: Option<&str>| s.map_or(0, |s| s.chars().count());

    count(title)
        + count(description)
        + count(author.map(|a| a.name.as_str()))
        + count(footer.map(|f| f.text.as_str()))
        + fields
            .iter()
            .map(|f| f.name.chars().count() + f.value.chars().count())
            .sum::<usize>()
}

fn check_text(field: &str, value: &str, max: usize) -> Result<(), ConvertError> {
    if value.trim().is_empty() {
        return Err(ConvertError::schema(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max {
        return Err(ConvertError::schema(
            field,
            format!("is {len} characters long, the limit is {max}"),
        ));
    }
    Ok(())
}

fn check_url(field: &str, url: &str) -> Result<(), ConvertError> {
    if ACCEPTED_URL_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme) && url.len() > scheme.len())
    {
        Ok(())
    } else {
        Err(ConvertError::schema(
            field,
            format!(
                "`{url}` is not a valid URL (expected one of {})",
                ACCEPTED_URL_SCHEMES.join(", ")
            ),
        ))
    }
}

fn validate(draft: &EmbedDraft) -> Result<(), ConvertError> {
    if let Some(title) = &draft.title {
        check_text("title", title, MAX_TITLE_CHARS)?;
    }
    if let Some(description) = &draft.description {
        check_text("description", description, MAX_DESCRIPTION_CHARS)?;
    }
    if let Some(color) = draft.color {
        if color > MAX_COLOR {
            return Err(ConvertError::schema(
                "color",
                format!("{color:#x} is not a 24-bit RGB value"),
            ));
        }
    }
    if let Some(author) = &draft.author {
        check_text("author.name", &author.name, MAX_AUTHOR_NAME_CHARS)?;
        if let Some(url) = &author.icon_url {
            check_url("author.icon_url", url)?;
        }
        if let Some(url) = &author.url {
            check_url("author.url", url)?;
        }
    }
    if let Some(footer) = &draft.footer {
        check_text("footer.text", &footer.text, MAX_FOOTER_TEXT_CHARS)?;
        if let Some(url) = &footer.icon_url {
            check_url("footer.icon_url", url)?;
        }
    }
    if let Some(image) = &draft.image {
        check_url("image.url", &image.url)?;
    }
    if let Some(thumbnail) = &draft.thumbnail {
        check_url("thumbnail.url", &thumbnail.url)?;
    }

    if draft.fields.len() > MAX_FIELDS {
        return Err(ConvertError::schema(
            "fields",
            format!(
                "has {} entries, at most {MAX_FIELDS} are allowed",
                draft.fields.len()
            ),
        ));
    }
    for (i, field) in draft.fields.iter().enumerate() {
        check_text(&format!("fields[{i}].name"), &field.name, MAX_FIELD_NAME_CHARS)?;
        check_text(&format!("fields[{i}].value"), &field.value, MAX_FIELD_VALUE_CHARS)?;
    }

    let is_empty = draft.title.is_none()
        && draft.description.is_none()
        && draft.fields.is_empty()
        && draft.image.is_none()
        && draft.author.is_none();
    if is_empty {
        return Err(ConvertError::schema(
            "embed",
            "empty document: set at least one of title, description, fields, image or author",
        ));
    }

    let total = total_chars(
        draft.title.as_deref(),
        draft.description.as_deref(),
        draft.author.as_ref(),
        draft.footer.as_ref(),
        &draft.fields,
    );
    if total > MAX_TOTAL_CHARS {
        return Err(ConvertError::schema(
            "embed",
            format!("total text is {total} characters, the limit is {MAX_TOTAL_CHARS}"),
        ));
    }

    Ok(())
}

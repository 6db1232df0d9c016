//! Raw inputs handed to the converter by the host.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::embed::EmbedDraft;

/// Kind tag the platform attaches to every rendered embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmbedKind {
    /// Structured embed authored by a bot or webhook.
    Rich,
    Image,
    Video,
    Gifv,
    Article,
    Link,
    AutoModerationMessage,
    PollResult,
}

/// An embed as it appears on an already delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEmbed {
    pub kind: EmbedKind,
    pub content: EmbedDraft,
}

impl RenderedEmbed {
    pub fn new(kind: EmbedKind, content: EmbedDraft) -> Self {
        Self { kind, content }
    }

    pub fn rich(content: EmbedDraft) -> Self {
        Self::new(EmbedKind::Rich, content)
    }
}

/// A file the host already downloaded from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Where the embed content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionSource {
    /// Copy an embed from a delivered message. `index` is clamped into range.
    Message {
        embeds: Vec<RenderedEmbed>,
        index: usize,
    },
    /// Read the first attachment of the invoking message, if any.
    File(Option<Attachment>),
    /// JSON or shorthand text typed by the operator.
    Text(String),
}

impl ConversionSource {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn file(attachment: Attachment) -> Self {
        Self::File(Some(attachment))
    }

    pub fn message(embeds: Vec<RenderedEmbed>, index: usize) -> Self {
        Self::Message { embeds, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_platform_tags() {
        assert_eq!("rich".parse::<EmbedKind>().unwrap(), EmbedKind::Rich);
        assert_eq!("gifv".parse::<EmbedKind>().unwrap(), EmbedKind::Gifv);
        assert_eq!(
            "auto_moderation_message".parse::<EmbedKind>().unwrap(),
            EmbedKind::AutoModerationMessage
        );
        assert!("hologram".parse::<EmbedKind>().is_err());
        assert_eq!(EmbedKind::Video.to_string(), "video");
    }
}

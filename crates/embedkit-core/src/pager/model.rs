//! Paginator domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::embed::EmbedDocument;

/// Identity of a chat user as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of one paginator session, usually the triggering interaction id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a random id for sessions not tied to a host interaction.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One prerendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Page {
    Embed(EmbedDocument),
    Text(String),
}

impl Page {
    pub fn as_embed(&self) -> Option<&EmbedDocument> {
        match self {
            Self::Embed(document) => Some(document),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Embed(_) => None,
        }
    }
}

impl From<EmbedDocument> for Page {
    fn from(document: EmbedDocument) -> Self {
        Self::Embed(document)
    }
}

impl From<String> for Page {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A navigation control the host renders as a button or reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "control", content = "page", rename_all = "snake_case")]
pub enum Control {
    First,
    Prev,
    Next,
    Last,
    /// Go to a zero-based page index; out-of-range values are clamped.
    Jump(usize),
    Close,
}

impl Control {
    /// Button/reaction label used by hosts that render emoji controls.
    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "⏮",
            Self::Prev => "◀",
            Self::Next => "▶",
            Self::Last => "⏭",
            Self::Jump(_) => "🔢",
            Self::Close => "🛑",
        }
    }
}

/// A control activation delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub session_id: SessionId,
    pub actor: ActorId,
    pub control: Control,
}

impl NavigationEvent {
    pub fn new(session_id: SessionId, actor: ActorId, control: Control) -> Self {
        Self {
            session_id,
            actor,
            control,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Explicit,
    IdleTimeout,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Closed(CloseReason),
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

//! Host adapter seam.
//!
//! The chat transport implements [`RenderSink`]; embedkit never talks to the
//! network itself. Identity and permission tier arrive as an [`Invoker`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use embedkit_core::PermissionLevel;
use embedkit_core::error::Result;
use embedkit_core::pager::{ActorId, Control, Page, SessionId};

/// Where a page is rendered (a chat channel, a terminal, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A message the host already rendered and can edit in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub channel: ChannelId,
    pub message_id: String,
}

impl MessageHandle {
    pub fn new(channel: ChannelId, message_id: impl Into<String>) -> Self {
        Self {
            channel,
            message_id: message_id.into(),
        }
    }
}

/// Who triggered a use case and with which tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoker {
    pub actor: ActorId,
    pub level: PermissionLevel,
}

impl Invoker {
    pub fn new(actor: impl Into<ActorId>, level: PermissionLevel) -> Self {
        Self {
            actor: actor.into(),
            level,
        }
    }
}

/// Output side of the host adapter.
///
/// `label` is the paginator position ("Page 2/5"); `None` for one-off posts.
#[async_trait]
pub trait RenderSink: Send + Sync {
    /// Renders a new message and returns a handle to it.
    async fn render_page(
        &self,
        channel: &ChannelId,
        page: &Page,
        label: Option<&str>,
    ) -> Result<MessageHandle>;

    /// Replaces the content of a rendered message.
    async fn update_page(
        &self,
        handle: &MessageHandle,
        page: &Page,
        label: Option<&str>,
    ) -> Result<()>;

    /// Attaches navigation controls routed to `session_id`.
    async fn attach_controls(
        &self,
        handle: &MessageHandle,
        session_id: &SessionId,
        controls: &[Control],
    ) -> Result<()>;

    /// Removes every control from a rendered message.
    async fn detach_controls(&self, handle: &MessageHandle) -> Result<()>;
}

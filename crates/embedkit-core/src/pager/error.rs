//! Paginator transition failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ActorId, SessionId};

/// Why a paginator transition was refused. The index never moves on error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagerError {
    /// Someone other than the session owner pressed a control
    #[error("Only the user who opened this view can use its controls (got {actor})")]
    NotAuthorized { actor: ActorId },

    /// The session already closed
    #[error("This view is closed")]
    SessionClosed,

    /// The event was addressed to a different session
    #[error("Event for session {got} delivered to session {expected}")]
    StaleEvent { expected: SessionId, got: SessionId },

    /// The event arrived inside the debounce window of the previous one
    #[error("Navigation ignored: too soon after the previous one")]
    Debounced,

    /// A session needs at least one page
    #[error("Cannot open a view without pages")]
    NoPages,
}

impl PagerError {
    /// Check if this error comes from an expected race and should be dropped
    /// without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::SessionClosed | Self::StaleEvent { .. } | Self::Debounced
        )
    }

    /// Check if this is a NotAuthorized error
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, Self::NotAuthorized { .. })
    }
}

//! Routing of host events to running paginators.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use embedkit_core::error::Result;
use embedkit_core::pager::{ActorId, NavigationEvent, PagerError, PaginatorSession, SessionId};

use super::driver::{DriverOutcome, PaginatorDriver};
use crate::host::{ChannelId, MessageHandle, RenderSink};

/// Event channel of a running driver and the actor allowed to use it.
#[derive(Debug, Clone)]
struct RegisteredSession {
    events: mpsc::Sender<NavigationEvent>,
    owner: Option<ActorId>,
}

type Sessions = Arc<RwLock<HashMap<SessionId, RegisteredSession>>>;

/// A paginator opened through the registry.
#[derive(Debug)]
pub struct OpenedPaginator {
    pub session_id: SessionId,
    pub message: MessageHandle,
    pub task: JoinHandle<Option<DriverOutcome>>,
}

/// Maps session ids to their driver tasks.
///
/// Entries are removed as soon as a driver stops, so a late event for a
/// finished session is reported as [`PagerError::SessionClosed`]. Events from
/// anyone but the session owner are refused here, before they reach the
/// driver, so the host can tell the actor.
pub struct PaginatorRegistry {
    sink: Arc<dyn RenderSink>,
    sessions: Sessions,
}

impl PaginatorRegistry {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self {
            sink,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts a driver for `session` and registers it for dispatch.
    ///
    /// The returned task yields `None` only if the driver panicked.
    pub async fn open(
        &self,
        session: PaginatorSession,
        channel: &ChannelId,
    ) -> Result<OpenedPaginator> {
        let owner = session.authorized_actor().cloned();
        let handle = PaginatorDriver::start(session, Arc::clone(&self.sink), channel).await?;
        let session_id = handle.session_id.clone();
        self.sessions.write().await.insert(
            session_id.clone(),
            RegisteredSession {
                events: handle.events,
                owner,
            },
        );

        let registry = Arc::clone(&self.sessions);
        let driver_task = handle.task;
        let forget_id = session_id.clone();
        let task = tokio::spawn(async move {
            let outcome = match driver_task.await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    error!(session_id = %forget_id, error = %e, "Paginator task failed");
                    None
                }
            };
            registry.write().await.remove(&forget_id);
            debug!(session_id = %forget_id, "Forgot paginator");
            outcome
        });

        Ok(OpenedPaginator {
            session_id,
            message: handle.message,
            task,
        })
    }

    /// Forwards a host event to its session.
    ///
    /// Fails with [`PagerError::SessionClosed`] when the session is gone and
    /// with [`PagerError::NotAuthorized`] when `event.actor` does not own it.
    pub async fn dispatch(&self, event: NavigationEvent) -> Result<()> {
        let registered = {
            let sessions = self.sessions.read().await;
            sessions.get(&event.session_id).cloned()
        };
        let Some(registered) = registered else {
            return Err(PagerError::SessionClosed.into());
        };
        if let Some(owner) = &registered.owner {
            if *owner != event.actor {
                warn!(
                    session_id = %event.session_id,
                    actor = %event.actor,
                    "Refused control from a foreign actor"
                );
                return Err(PagerError::NotAuthorized { actor: event.actor }.into());
            }
        }
        registered
            .events
            .send(event)
            .await
            .map_err(|_| PagerError::SessionClosed.into())
    }

    pub async fn is_open(&self, session_id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn open_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

//! Per-session paginator task.
//!
//! Each open view gets one task owning its [`PaginatorSession`]. The task
//! races the next [`NavigationEvent`] against the idle deadline, re-renders
//! on every page change and detaches the controls once when it stops.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use embedkit_core::error::Result;
use embedkit_core::pager::{
    ActorId, CloseReason, Control, NavigationEvent, PagerError, PaginatorSession, SessionId,
    SessionState, Transition,
};

use crate::host::{ChannelId, MessageHandle, RenderSink};

/// Actor used for closes initiated by the host itself.
const HOST_ACTOR: &str = "host";

/// Buffered navigation events per session.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Final state reported when a driver task ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOutcome {
    pub session_id: SessionId,
    pub reason: CloseReason,
    pub final_index: usize,
}

/// Handle to a running paginator task.
#[derive(Debug)]
pub struct PaginatorHandle {
    pub session_id: SessionId,
    pub message: MessageHandle,
    pub events: mpsc::Sender<NavigationEvent>,
    pub task: JoinHandle<DriverOutcome>,
}

pub struct PaginatorDriver {
    session: PaginatorSession,
    sink: Arc<dyn RenderSink>,
    message: MessageHandle,
    events: mpsc::Receiver<NavigationEvent>,
}

impl PaginatorDriver {
    /// Renders the first page, attaches controls and spawns the event loop.
    pub async fn start(
        session: PaginatorSession,
        sink: Arc<dyn RenderSink>,
        channel: &ChannelId,
    ) -> Result<PaginatorHandle> {
        let message = sink
            .render_page(channel, session.current_page(), Some(&session.page_label()))
            .await?;
        sink.attach_controls(&message, session.id(), &session.controls())
            .await?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session_id = session.id().clone();
        info!(
            session_id = %session_id,
            pages = session.len(),
            channel = %channel,
            "Opened paginator"
        );

        let driver = Self {
            session,
            sink,
            message: message.clone(),
            events: rx,
        };
        let task = tokio::spawn(driver.run());

        Ok(PaginatorHandle {
            session_id,
            message,
            events: tx,
            task,
        })
    }

    async fn run(mut self) -> DriverOutcome {
        let reason = loop {
            let deadline = Instant::from_std(self.session.idle_deadline());

            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Some(event) => {
                            if let Some(reason) = self.handle_event(event).await {
                                break reason;
                            }
                        }
                        None => {
                            debug!(session_id = %self.session.id(), "Event stream closed");
                            break self.close_abandoned();
                        }
                    }
                }
                _ = sleep_until(deadline) => {
                    self.session.expire();
                    break CloseReason::IdleTimeout;
                }
            }
        };

        if let Err(e) = self.sink.detach_controls(&self.message).await {
            warn!(session_id = %self.session.id(), error = %e, "Failed to detach controls");
        }
        info!(session_id = %self.session.id(), ?reason, "Closed paginator");

        DriverOutcome {
            session_id: self.session.id().clone(),
            reason,
            final_index: self.session.index(),
        }
    }

    /// Applies one event. Returns the close reason once the session ends.
    async fn handle_event(&mut self, event: NavigationEvent) -> Option<CloseReason> {
        let now = Instant::now().into_std();

        match self.session.apply_at(&event, now) {
            Ok(Transition::Navigated { changed: true, index }) => {
                debug!(session_id = %self.session.id(), index, "Navigated");
                let label = self.session.page_label();
                if let Err(e) = self
                    .sink
                    .update_page(&self.message, self.session.current_page(), Some(&label))
                    .await
                {
                    warn!(session_id = %self.session.id(), error = %e, "Failed to update page");
                }
                None
            }
            Ok(Transition::Navigated { changed: false, .. }) => None,
            Ok(Transition::Closed { .. }) => match self.session.state() {
                SessionState::Closed(reason) => Some(reason),
                SessionState::Active => None,
            },
            Err(e @ PagerError::NotAuthorized { .. }) => {
                warn!(session_id = %self.session.id(), actor = %event.actor, "{e}");
                None
            }
            Err(e) => {
                debug!(session_id = %self.session.id(), actor = %event.actor, "Ignored event: {e}");
                None
            }
        }
    }

    /// Closes the session after the host dropped every event sender.
    fn close_abandoned(&mut self) -> CloseReason {
        let actor = self
            .session
            .authorized_actor()
            .cloned()
            .unwrap_or_else(|| ActorId::new(HOST_ACTOR));
        let event = NavigationEvent::new(self.session.id().clone(), actor, Control::Close);
        let _ = self.session.apply_at(&event, Instant::now().into_std());
        CloseReason::Explicit
    }
}

//! The paginator state machine.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::{
    ActorId, CloseReason, Control, NavigationEvent, Page, PagerError, SessionId, SessionState,
};

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorOptions {
    /// Inactivity after which the session closes itself.
    pub idle_timeout: Duration,
    /// Minimum spacing between accepted navigations. Zero disables debouncing.
    pub debounce: Duration,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(180),
            debounce: Duration::ZERO,
        }
    }
}

/// Result of an accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session is showing `index`; `changed` is false when the move was
    /// clamped into a no-op (e.g. `Next` on the last page).
    Navigated { index: usize, changed: bool },
    /// The session is closed; `newly` is false when it already was.
    Closed { newly: bool },
}

/// One interactive browsing session over a fixed list of pages.
///
/// Invariant: `0 <= index < pages.len()` and `pages` is never empty.
#[derive(Debug, Clone)]
pub struct PaginatorSession {
    id: SessionId,
    pages: Vec<Page>,
    index: usize,
    authorized_actor: Option<ActorId>,
    state: SessionState,
    options: PaginatorOptions,
    last_activity: Instant,
    last_navigation: Option<Instant>,
}

impl PaginatorSession {
    /// Opens a session on the first page.
    ///
    /// `authorized_actor` of `None` lets anyone drive the session (broadcast views).
    pub fn new(
        id: SessionId,
        pages: Vec<Page>,
        authorized_actor: Option<ActorId>,
        options: PaginatorOptions,
    ) -> Result<Self, PagerError> {
        Self::new_at(id, pages, authorized_actor, options, Instant::now())
    }

    /// Same as [`new`](Self::new) with an explicit clock reading.
    pub fn new_at(
        id: SessionId,
        pages: Vec<Page>,
        authorized_actor: Option<ActorId>,
        options: PaginatorOptions,
        now: Instant,
    ) -> Result<Self, PagerError> {
        if pages.is_empty() {
            return Err(PagerError::NoPages);
        }

        Ok(Self {
            id,
            pages,
            index: 0,
            authorized_actor,
            state: SessionState::Active,
            options,
            last_activity: now,
            last_navigation: None,
        })
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; a session holds at least one page.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.index]
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn authorized_actor(&self) -> Option<&ActorId> {
        self.authorized_actor.as_ref()
    }

    pub fn options(&self) -> PaginatorOptions {
        self.options
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Instant after which the session counts as idle.
    pub fn idle_deadline(&self) -> Instant {
        self.last_activity + self.options.idle_timeout
    }

    /// "Page 2/5" style position label.
    pub fn page_label(&self) -> String {
        format!("Page {}/{}", self.index + 1, self.pages.len())
    }

    /// Controls the host should attach. Single-page sessions only get `Close`.
    pub fn controls(&self) -> Vec<Control> {
        if self.pages.len() > 1 {
            vec![
                Control::First,
                Control::Prev,
                Control::Next,
                Control::Last,
                Control::Close,
            ]
        } else {
            vec![Control::Close]
        }
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Applies `event` using the current time.
    pub fn apply(&mut self, event: &NavigationEvent) -> Result<Transition, PagerError> {
        self.apply_at(event, Instant::now())
    }

    /// Applies `event` as of `now`.
    ///
    /// Checks run in order: closed session, foreign session id, actor,
    /// debounce window. A rejected event leaves the session untouched.
    pub fn apply_at(
        &mut self,
        event: &NavigationEvent,
        now: Instant,
    ) -> Result<Transition, PagerError> {
        if !self.is_active() {
            return match event.control {
                Control::Close => Ok(Transition::Closed { newly: false }),
                _ => Err(PagerError::SessionClosed),
            };
        }
        if event.session_id != self.id {
            return Err(PagerError::StaleEvent {
                expected: self.id.clone(),
                got: event.session_id.clone(),
            });
        }
        if let Some(owner) = &self.authorized_actor {
            if *owner != event.actor {
                return Err(PagerError::NotAuthorized {
                    actor: event.actor.clone(),
                });
            }
        }

        if event.control != Control::Close {
            if let Some(previous) = self.last_navigation {
                if now.saturating_duration_since(previous) < self.options.debounce {
                    return Err(PagerError::Debounced);
                }
            }
        }

        let last = self.pages.len() - 1;
        let target = match event.control {
            Control::First => 0,
            Control::Prev => self.index.saturating_sub(1),
            Control::Next => (self.index + 1).min(last),
            Control::Last => last,
            Control::Jump(k) => k.min(last),
            Control::Close => {
                self.state = SessionState::Closed(CloseReason::Explicit);
                self.last_activity = now;
                return Ok(Transition::Closed { newly: true });
            }
        };

        let changed = target != self.index;
        self.index = target;
        self.last_activity = now;
        self.last_navigation = Some(now);
        Ok(Transition::Navigated {
            index: target,
            changed,
        })
    }

    fn navigate(&mut self, actor: &ActorId, control: Control) -> Result<&Page, PagerError> {
        let event = NavigationEvent::new(self.id.clone(), actor.clone(), control);
        self.apply(&event)?;
        Ok(self.current_page())
    }

    /// Moves one page forward, stopping at the last page.
    pub fn next(&mut self, actor: &ActorId) -> Result<&Page, PagerError> {
        self.navigate(actor, Control::Next)
    }

    /// Moves one page back, stopping at the first page.
    pub fn prev(&mut self, actor: &ActorId) -> Result<&Page, PagerError> {
        self.navigate(actor, Control::Prev)
    }

    pub fn first(&mut self, actor: &ActorId) -> Result<&Page, PagerError> {
        self.navigate(actor, Control::First)
    }

    pub fn last(&mut self, actor: &ActorId) -> Result<&Page, PagerError> {
        self.navigate(actor, Control::Last)
    }

    /// Jumps to page `k`, clamped into range.
    pub fn jump(&mut self, actor: &ActorId, k: usize) -> Result<&Page, PagerError> {
        self.navigate(actor, Control::Jump(k))
    }

    /// Closes the session. Returns whether this call did the closing;
    /// closing an already closed session is a no-op.
    pub fn close(&mut self, actor: &ActorId) -> Result<bool, PagerError> {
        let event = NavigationEvent::new(self.id.clone(), actor.clone(), Control::Close);
        match self.apply(&event)? {
            Transition::Closed { newly } => Ok(newly),
            Transition::Navigated { .. } => Ok(false),
        }
    }

    /// Closes the session if it has been idle longer than the timeout.
    /// Returns whether this call closed it.
    pub fn idle_tick(&mut self) -> bool {
        self.idle_tick_at(Instant::now())
    }

    pub fn idle_tick_at(&mut self, now: Instant) -> bool {
        if self.is_active()
            && now.saturating_duration_since(self.last_activity) > self.options.idle_timeout
        {
            self.expire()
        } else {
            false
        }
    }

    /// Closes the session as timed out, regardless of the clock. Used by
    /// hosts that run their own idle timer. Returns whether this call closed it.
    pub fn expire(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = SessionState::Closed(CloseReason::IdleTimeout);
        true
    }
}

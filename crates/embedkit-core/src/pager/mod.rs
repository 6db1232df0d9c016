//! Interactive paginator sessions.
//!
//! A [`PaginatorSession`] is a synchronous state machine: the host feeds it
//! [`NavigationEvent`]s in arrival order and re-renders whatever page the
//! session reports. Timers and transport live with the host.

pub mod error;
pub mod model;
pub mod session;

pub use error::PagerError;
pub use model::{ActorId, CloseReason, Control, NavigationEvent, Page, SessionId, SessionState};
pub use session::{PaginatorOptions, PaginatorSession, Transition};

//! Paginator hosting: driver tasks and the session registry.

pub mod driver;
pub mod registry;

pub use driver::{DriverOutcome, PaginatorDriver, PaginatorHandle};
pub use registry::{OpenedPaginator, PaginatorRegistry};

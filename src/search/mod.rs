//! Search orchestration module
//!
//! Validates a query, dispatches it to one provider under a timeout, and
//! normalizes, rewrites and sorts what comes back.

mod context;
mod executor;
mod models;

pub use context::SearchContext;
pub use executor::Search;
pub use models::*;

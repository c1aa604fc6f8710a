//! Result types and list operations
//!
//! Defines the normalized result record and the rewrite, sort and pagination
//! rules applied to result lists.

mod ordering;
mod rewrite;
mod types;

pub use ordering::{page_bounds, paginate, sort_by_title};
pub use rewrite::RewriteRule;
pub use types::*;

//! Web server module
//!
//! Provides the HTTP API and the search page for Ferret-RS.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::{parse_provider_list, AppState, ProviderSummary};
pub use templates::Templates;

//! Ferret-RS: a federated keyword search orchestrator
//!
//! Dispatches one keyword query to a named provider (AnswerHub, Consul,
//! GitHub, Slack or Trello), normalizes and sorts the results, and can open a
//! chosen result with a local command.

pub mod cli;
pub mod config;
pub mod error;
pub mod goto;
pub mod network;
pub mod providers;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{FetchError, SearchError};
pub use providers::{ProviderRegistry, Searcher};
pub use results::SearchResult;
pub use search::{Query, Search, SearchContext};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Search provider module
//!
//! Defines the Searcher trait, the provider registry and the adapters for each
//! supported backend.

mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod answerhub;
pub mod consul;
pub mod github;
pub mod slack;
pub mod trello;

pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;

//! HTTP networking module
//!
//! Provides the HTTP client providers use and the cancellable fetch contract
//! that binds each outbound call to the caller's context.

mod client;
mod fetch;

pub use client::HttpClient;
pub use fetch::fetch;

//! Cancellation context handed to providers
//!
//! A [`SearchContext`] combines an explicit cancellation token with an
//! optional deadline. Children inherit both and may only shorten the deadline.

use crate::error::FetchError;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus deadline
#[derive(Debug, Clone)]
pub struct SearchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl SearchContext {
    /// A context that is never done unless canceled
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Wrap an externally owned token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a child bounded by `timeout` from now
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            token: self.token.child_token(),
            deadline: Some(match self.deadline {
                Some(parent) if parent < deadline => parent,
                _ => deadline,
            }),
        }
    }

    /// Cancel this context and all of its children
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Termination reason if the context is already done
    pub fn err(&self) -> Option<FetchError> {
        if self.token.is_cancelled() {
            return Some(FetchError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(FetchError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is canceled or its deadline passes
    pub async fn done(&self) -> FetchError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => FetchError::Canceled,
                    _ = tokio::time::sleep_until(deadline) => FetchError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                FetchError::Canceled
            }
        }
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::background()
    }
}

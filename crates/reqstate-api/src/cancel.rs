// Cancellation handle attached to an outgoing call.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// Cooperative cancellation for one call, carrying a human-readable reason.
///
/// Cheap to clone; clones observe the same cancellation. The first reason
/// given wins, later `cancel` calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
    reason: Arc<OnceLock<String>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self, reason: impl Into<String>) {
        let _ = self.reason.set(reason.into());
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The reason passed to the first [`cancel`](Self::cancel) call.
    pub fn reason(&self) -> Option<&str> {
        self.reason.get().map(String::as_str)
    }

    /// Resolves once the handle is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

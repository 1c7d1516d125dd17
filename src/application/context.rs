use std::future::Future;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::error::{DiscussionError, DiscussionResult};

/// Who is acting, plus the cancellation signal of the surrounding request.
///
/// Every call into a port goes through [`RequestContext::step`], which is the
/// only place a use case may suspend.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor_id: Uuid,
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(actor_id: Uuid) -> Self {
        Self {
            actor_id,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(actor_id: Uuid, cancel: CancellationToken) -> Self {
        Self { actor_id, cancel }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn ensure_active(&self) -> DiscussionResult<()> {
        if self.cancel.is_cancelled() {
            Err(DiscussionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Runs one I/O step, giving up as soon as the request is cancelled.
    /// Port failures are propagated as-is.
    pub async fn step<T, F>(&self, fut: F) -> DiscussionResult<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        self.ensure_active()?;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DiscussionError::Cancelled),
            res = fut => res.map_err(DiscussionError::Store),
        }
    }
}

//! Cancellation handle for one in-flight request.

use tokio::task::AbortHandle;
use uuid::Uuid;

/// Owns the cancellation capability of one spawned request task.
///
/// Cancelling is idempotent, and dropping the handle cancels the task.
#[derive(Debug)]
pub struct PendingRequestHandle {
    key: Uuid,
    abort: AbortHandle,
}

impl PendingRequestHandle {
    pub fn new(key: Uuid, abort: AbortHandle) -> Self {
        Self { key, abort }
    }

    pub fn key(&self) -> Uuid {
        self.key
    }

    pub fn cancel(&self) {
        self.abort.abort();
    }
}

impl Drop for PendingRequestHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

//! Conversion Interactor
//!
//! Wraps a [`CurrencyConversion`] port with a "one request at a time" policy
//! and normalizes API failures into display-ready [`InteractorError`]s.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use converter_client::PendingRequestHandle;
use converter_types::{
    ConversionQuery, Currency, CurrencyConversion, InteractorError, NetworkError, NetworkingError,
};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

type Slot = Mutex<Option<PendingRequestHandle>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<PendingRequestHandle>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_current(slot: &Option<PendingRequestHandle>, key: Uuid) -> bool {
    slot.as_ref().is_some_and(|handle| handle.key() == key)
}

/// Interactor owning at most one outstanding conversion.
///
/// Generic over `C: CurrencyConversion` - the API adapter is injected at
/// construction, so tests can run against an in-memory converter.
#[derive(Debug)]
pub struct ConverterInteractor<C: CurrencyConversion> {
    converter: Arc<C>,
    slot: Arc<Slot>,
    pending: watch::Sender<bool>,
}

impl<C: CurrencyConversion> ConverterInteractor<C> {
    /// Creates a new interactor around the given converter.
    pub fn new(converter: C) -> Self {
        Self::from_arc(Arc::new(converter))
    }

    /// Creates a new interactor sharing an existing converter.
    pub fn from_arc(converter: Arc<C>) -> Self {
        let (pending, _) = watch::channel(false);
        Self {
            converter,
            slot: Arc::new(Mutex::new(None)),
            pending,
        }
    }

    /// Returns a reference to the underlying converter.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Subscribes to the pending flag.
    pub fn pending(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// Cancels the outstanding conversion, if any, and clears the pending flag.
    pub fn cancel(&self) {
        let mut slot = lock(&self.slot);
        if let Some(handle) = slot.take() {
            debug!(key = %handle.key(), "cancelling outstanding conversion");
            handle.cancel();
            // Cleared under the lock so a concurrent `convert` cannot be marked idle.
            self.pending.send_replace(false);
        }
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// Equal currencies are rejected before anything is dispatched. Starting a
    /// conversion cancels the previous one, which then resolves with
    /// [`InteractorError::Cancelled`].
    #[instrument(skip(self))]
    pub async fn convert(
        &self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<f64, InteractorError> {
        if from == to {
            return Err(InteractorError::SameCurrency);
        }

        let query = ConversionQuery::new(amount, from, to);
        let key = Uuid::new_v4();

        // The slot stays locked until the new handle is stored, so the task
        // cannot resolve against a slot that does not know about it yet.
        let task = {
            let mut slot = lock(&self.slot);
            if let Some(previous) = slot.take() {
                debug!(key = %previous.key(), "superseding outstanding conversion");
                previous.cancel();
            }

            let converter = Arc::clone(&self.converter);
            let resolved = Arc::clone(&self.slot);
            let pending = self.pending.clone();
            let task = tokio::spawn(async move {
                let result = converter.get_conversion(query).await;
                // Pending drops when the API resolves, not when the caller gets around to it.
                let slot = lock(&resolved);
                if is_current(&slot, key) {
                    pending.send_replace(false);
                }
                result
            });

            *slot = Some(PendingRequestHandle::new(key, task.abort_handle()));
            self.pending.send_replace(true);
            task
        };

        let outstanding = Outstanding {
            key,
            slot: &self.slot,
            pending: &self.pending,
        };
        let joined = task.await;
        if !outstanding.release() {
            return Err(InteractorError::Cancelled);
        }

        match joined {
            Ok(Ok(value)) => Ok(value.value),
            Ok(Err(err)) => {
                debug!(error = %err, "conversion failed");
                Err(err.into())
            }
            Err(err) if err.is_cancelled() => Err(InteractorError::Cancelled),
            Err(err) => {
                warn!(error = %err, "conversion task panicked");
                Err(NetworkError::from(NetworkingError::Unknown(err.to_string())).into())
            }
        }
    }
}

/// Clears the slot when the awaiting caller finishes or is dropped.
struct Outstanding<'a> {
    key: Uuid,
    slot: &'a Slot,
    pending: &'a watch::Sender<bool>,
}

impl Outstanding<'_> {
    /// Returns whether the slot still held this conversion, i.e. it was not superseded or cancelled.
    fn release(&self) -> bool {
        let mut slot = lock(self.slot);
        if !is_current(&slot, self.key) {
            return false;
        }
        // Dropping the handle aborts the request if it is still running.
        slot.take();
        self.pending.send_if_modified(|pending| std::mem::replace(pending, false));
        true
    }
}

impl Drop for Outstanding<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

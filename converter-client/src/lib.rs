//! # Converter Client
//!
//! A typed Rust client for the currency exchange API.
//!
//! The client serves one logical "latest" conversion lineage: starting a
//! conversion cancels every request this client still has in flight, so a
//! stale response can never overwrite a fresher one.

mod handle;
mod request_builder;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use converter_types::{
    ConversionQuery, ConversionResponse, ConversionValue, CurrencyConversion, NetworkError,
    NetworkingError, ServerErrorPayload,
};
use reqwest::{Client, Url, header::ACCEPT};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

pub use handle::PendingRequestHandle;
pub use request_builder::{RequestBuilder, RequestDescriptor};

/// Public endpoint of the exchange API.
pub const DEFAULT_BASE_URL: &str = "http://api.evp.lt";

/// Error type for client construction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

type InFlight = Mutex<HashMap<Uuid, PendingRequestHandle>>;

fn lock(table: &InFlight) -> MutexGuard<'_, HashMap<Uuid, PendingRequestHandle>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exchange API client.
#[derive(Debug, Clone)]
pub struct ConversionApiClient {
    builder: RequestBuilder,
    http: Client,
    in_flight: Arc<InFlight>,
}

impl ConversionApiClient {
    /// Creates a new client. An invalid base URL is a construction-time error.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let builder = RequestBuilder::new(&config.base_url)?;
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            builder,
            http,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn base_url(&self) -> &Url {
        self.builder.base_url()
    }

    /// Number of requests currently tracked as in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Cancels the request tracked under `key`. Returns false if it was not tracked.
    pub fn cancel(&self, key: Uuid) -> bool {
        let removed = lock(&self.in_flight).remove(&key);
        match removed {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let stale: Vec<PendingRequestHandle> =
            lock(&self.in_flight).drain().map(|(_, h)| h).collect();
        for handle in stale {
            handle.cancel();
        }
    }

    /// Converts `query.amount` of `query.from` into `query.to`.
    ///
    /// Never fails with anything but a [`NetworkError`]; a request superseded
    /// by a later call resolves with [`NetworkError::Cancelled`].
    #[instrument(skip(self), fields(amount = query.amount, from = %query.from, to = %query.to))]
    pub async fn get_conversion(
        &self,
        query: ConversionQuery,
    ) -> Result<ConversionValue, NetworkError> {
        let (_, outcome) = self.start_conversion(query);
        outcome.await
    }

    /// Dispatches a conversion and returns its tracking key with the pending outcome.
    ///
    /// The request is already in flight when this returns, so the key can be
    /// passed to [`cancel`](Self::cancel) before the outcome is awaited.
    /// Dropping the outcome stops tracking and aborts the request.
    pub fn start_conversion(
        &self,
        query: ConversionQuery,
    ) -> (
        Uuid,
        impl Future<Output = Result<ConversionValue, NetworkError>> + Send + '_,
    ) {
        let descriptor = self.builder.build(&query);
        let key = Uuid::new_v4();

        // Purge and insert in one critical section so no completion can observe a half-updated table.
        let task = {
            let mut table = lock(&self.in_flight);
            for (stale_key, handle) in table.drain() {
                debug!(%stale_key, "cancelling superseded request");
                handle.cancel();
            }
            let task = tokio::spawn(execute(self.http.clone(), descriptor));
            table.insert(key, PendingRequestHandle::new(key, task.abort_handle()));
            task
        };
        let tracking = Tracking {
            key,
            table: &self.in_flight,
        };

        let outcome = async move {
            let joined = task.await;
            if !tracking.release() {
                // Superseded or cancelled after the task had already produced a result.
                return Err(NetworkError::Cancelled);
            }

            match joined {
                Ok(result) => result,
                Err(err) if err.is_cancelled() => Err(NetworkError::Cancelled),
                Err(err) => {
                    warn!(error = %err, "conversion task panicked");
                    Err(NetworkingError::Unknown(err.to_string()).into())
                }
            }
        };
        (key, outcome)
    }
}

#[async_trait::async_trait]
impl CurrencyConversion for ConversionApiClient {
    async fn get_conversion(
        &self,
        query: ConversionQuery,
    ) -> Result<ConversionValue, NetworkError> {
        ConversionApiClient::get_conversion(self, query).await
    }
}

/// Removes the tracking entry when the awaiting caller finishes or is dropped.
struct Tracking<'a> {
    key: Uuid,
    table: &'a InFlight,
}

impl Tracking<'_> {
    /// Returns whether the entry was still tracked, i.e. not superseded or cancelled.
    fn release(&self) -> bool {
        lock(self.table).remove(&self.key).is_some()
    }
}

impl Drop for Tracking<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

async fn execute(
    http: Client,
    descriptor: RequestDescriptor,
) -> Result<ConversionValue, NetworkError> {
    debug!(url = %descriptor.url, "sending conversion request");
    let resp = http
        .request(descriptor.method, descriptor.url)
        .header(ACCEPT, descriptor.accept)
        .send()
        .await
        .map_err(classify_transport_error)?;

    let status = resp.status();
    let body = resp.bytes().await.map_err(classify_transport_error)?;

    if !status.is_success() {
        let payload = serde_json::from_slice::<ServerErrorPayload>(&body).ok();
        debug!(status = status.as_u16(), ?payload, "conversion rejected");
        return Err(NetworkError::BadResponseCode {
            status: status.as_u16(),
            payload,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(NetworkError::BadResponseData);
    }

    let decoded: ConversionResponse = serde_json::from_slice(&body)
        .map_err(|e| NetworkError::BadResponseFormat(e.to_string()))?;
    ConversionValue::try_from(decoded)
}

fn classify_transport_error(err: reqwest::Error) -> NetworkError {
    let kind = if err.is_timeout() {
        NetworkingError::RequestTimeout
    } else if err.is_connect() {
        NetworkingError::NoInternetConnection
    } else if err.is_request() || err.is_body() || err.is_decode() || err.is_redirect() {
        NetworkingError::Other(err.to_string())
    } else {
        NetworkingError::Unknown(err.to_string())
    };
    NetworkError::Networking(kind)
}

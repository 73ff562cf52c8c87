// ── Request controller ──
//
// Orchestrates one logical request slot: config merging, cache lookup,
// cancellation of the previous call, envelope classification, and state
// dispatch through the owned `StateStore`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use reqstate_api::{CancelHandle, Envelope, RequestConfig, Transport};

use crate::cache::{CacheKey, MemoryCache, ResponseCache};
use crate::error::RequestError;
use crate::normalize::normalize;
use crate::store::{Action, RequestState, StateStore};
use crate::stream::StateStream;

/// Reason given to the previous call when a new one replaces it.
pub const CANCEL_PREVIOUS_REASON: &str = "cancel previous request";

const DROPPED_REASON: &str = "request dropped";

/// What a finished call produced before classification.
enum WorkingResult {
    Body(Value),
    Failure(reqstate_api::Error),
}

/// Issues calls through a [`Transport`] and tracks their outcome as
/// observable [`RequestState`].
///
/// Each `request` is tagged with a monotonic sequence number. Only the
/// latest call may write state or cache; a slower earlier call that
/// finishes afterwards is discarded.
pub struct RequestController<T, X>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    X: Transport,
{
    transport: Arc<X>,
    cache: Arc<dyn ResponseCache>,
    base: RequestConfig,
    cache_key: Option<CacheKey>,
    cancel_previous: bool,
    store: StateStore<T>,
    in_flight: ArcSwapOption<CancelHandle>,
    sequence: AtomicU64,
}

impl<T, X> RequestController<T, X>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    X: Transport,
{
    /// Create a controller over `transport` with `base` as its default
    /// config. Uses the process-wide [`MemoryCache`] unless
    /// [`with_cache`](Self::with_cache) says otherwise; no cache key and no
    /// cancel-previous by default.
    pub fn new(transport: Arc<X>, base: RequestConfig) -> Self {
        Self {
            transport,
            cache: MemoryCache::global(),
            base,
            cache_key: None,
            cancel_previous: false,
            store: StateStore::new(),
            in_flight: ArcSwapOption::empty(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<CacheKey>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn cancel_previous(mut self, enabled: bool) -> Self {
        self.cancel_previous = enabled;
        self
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn state(&self) -> RequestState<T> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> StateStream<T> {
        self.store.subscribe()
    }

    pub fn base_config(&self) -> &RequestConfig {
        &self.base
    }

    pub fn cache_key(&self) -> Option<&CacheKey> {
        self.cache_key.as_ref()
    }

    // ── Operations ───────────────────────────────────────────────

    /// Run one call and return its unwrapped payload, or `None` on any
    /// failure (the failure itself lands in `state().error`).
    ///
    /// With a cache key configured and `force_refresh` unset, a cached
    /// payload short-circuits the network entirely.
    ///
    /// `params` are routed by the merged config's method: when `overrides`
    /// sets a method, that method decides between query string and body.
    ///
    /// Dropping the returned future mid-call (a timeout, a lost `select!`,
    /// an aborted task) cancels the call and, if it was the latest, clears
    /// `loading`.
    pub async fn request(
        &self,
        params: Option<Value>,
        overrides: Option<&RequestConfig>,
        force_refresh: bool,
    ) -> Option<T> {
        let mut config = match overrides {
            Some(overrides) => self.base.merge(overrides),
            None => self.base.clone(),
        };

        self.store.dispatch(Action::Loading(true));
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if !force_refresh {
            if let Some(hit) = self.cached() {
                self.store.dispatch(Action::Loading(false));
                self.store.dispatch(Action::Data(Some(hit.clone())));
                return Some(hit);
            }
        }

        if self.cancel_previous {
            if let Some(previous) = self.in_flight.load_full() {
                previous.cancel(CANCEL_PREVIOUS_REASON);
            }
        }
        let handle = Arc::new(CancelHandle::new());
        self.in_flight.store(Some(Arc::clone(&handle)));
        let mut pending = PendingCall {
            seq,
            handle: Arc::clone(&handle),
            store: &self.store,
            sequence: &self.sequence,
            in_flight: &self.in_flight,
            settled: false,
        };

        if let Some(params) = params {
            config = normalize(config.method(), params).apply(config);
        }

        debug!(seq, method = %config.method(), url = ?config.url, "issuing request");
        let sent = self.transport.send(&config, &handle).await;
        pending.settled = true;
        let working = match sent {
            Ok(body) => WorkingResult::Body(body),
            Err(err) => {
                warn!(seq, error = %err, "request failed");
                match err.into_response_body() {
                    Ok(body) => WorkingResult::Body(body),
                    Err(err) => WorkingResult::Failure(err),
                }
            }
        };
        let outcome = classify::<T>(working);

        if self.sequence.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding superseded response");
            return outcome.ok().map(|(payload, _)| payload);
        }

        self.store.dispatch(Action::Loading(false));
        match outcome {
            Ok((payload, raw)) => {
                self.store.dispatch(Action::Data(Some(payload.clone())));
                if let Some(ref key) = self.cache_key {
                    self.cache.set(key.clone(), raw);
                }
                Some(payload)
            }
            Err(error) => {
                self.store.dispatch(Action::Error(error));
                None
            }
        }
    }

    /// [`request`](Self::request) with typed parameters.
    pub async fn request_with<P: Serialize + ?Sized>(
        &self,
        params: &P,
        overrides: Option<&RequestConfig>,
        force_refresh: bool,
    ) -> Option<T> {
        match serde_json::to_value(params) {
            Ok(value) => self.request(Some(value), overrides, force_refresh).await,
            Err(e) => {
                self.store.dispatch(Action::Error(RequestError::Params {
                    message: e.to_string(),
                }));
                None
            }
        }
    }

    /// Plain call with the base config, cache allowed.
    pub async fn fetch(&self) -> Option<T> {
        self.request(None, None, false).await
    }

    /// Plain call with the base config, bypassing the cache.
    pub async fn refresh(&self) -> Option<T> {
        self.request(None, None, true).await
    }

    /// Set `data` directly, bypassing network and cache.
    pub fn update(&self, value: T) {
        self.store.dispatch(Action::Data(Some(value)));
    }

    /// Cancel the retained in-flight call, if any.
    pub fn cancel(&self, reason: &str) {
        if let Some(handle) = self.in_flight.load_full() {
            debug!(reason, "cancelling in-flight request");
            handle.cancel(reason);
        }
    }

    fn cached(&self) -> Option<T> {
        let key = self.cache_key.as_ref()?;
        let raw = self.cache.get(key)?;
        match serde_json::from_value(raw) {
            Ok(hit) => {
                debug!(%key, "cache hit");
                Some(hit)
            }
            Err(e) => {
                warn!(%key, error = %e, "cached value does not match payload type, refetching");
                None
            }
        }
    }
}

/// One network call awaiting its transport.
///
/// On drop the retained handle is released unless a newer call already
/// replaced it. A call dropped before the transport answered is cancelled,
/// and if it is still the latest its `Loading(true)` is undone.
struct PendingCall<'a, T: Clone + Send + Sync + 'static> {
    seq: u64,
    handle: Arc<CancelHandle>,
    store: &'a StateStore<T>,
    sequence: &'a AtomicU64,
    in_flight: &'a ArcSwapOption<CancelHandle>,
    settled: bool,
}

impl<T: Clone + Send + Sync + 'static> Drop for PendingCall<'_, T> {
    fn drop(&mut self) {
        let _ = self
            .in_flight
            .compare_and_swap(&self.handle, None::<Arc<CancelHandle>>);
        if self.settled {
            return;
        }

        self.handle.cancel(DROPPED_REASON);
        if self.sequence.load(Ordering::SeqCst) == self.seq {
            debug!(seq = self.seq, "request dropped before completion");
            self.store.dispatch(Action::Loading(false));
        }
    }
}

/// Apply the envelope convention to a working result.
///
/// Success yields the typed payload plus its raw JSON for the cache.
fn classify<T: DeserializeOwned>(working: WorkingResult) -> Result<(T, Value), RequestError> {
    let body = match working {
        WorkingResult::Body(body) => body,
        WorkingResult::Failure(err) => return Err(RequestError::Transport(Arc::new(err))),
    };

    let Some((success, data)) =
        Envelope::peek(&body).map(|envelope| (envelope.is_success(), envelope.data.cloned()))
    else {
        return Err(RequestError::InvalidShape { body });
    };
    if !success {
        return Err(RequestError::Rejected(body));
    }

    let raw = data.unwrap_or(Value::Null);
    match serde_json::from_value(raw.clone()) {
        Ok(payload) => Ok((payload, raw)),
        Err(e) => Err(RequestError::Payload {
            message: e.to_string(),
        }),
    }
}

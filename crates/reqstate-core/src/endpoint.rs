// ── Bound request factory ──
//
// Pre-binds method, URL, base config and controller options so call sites
// only supply parameters.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use reqstate_api::{Method, RequestConfig, Transport};

use crate::cache::{CacheKey, MemoryCache, ResponseCache};
use crate::controller::RequestController;
use crate::normalize::normalize;

/// A reusable description of one API endpoint.
///
/// Fields in the extra config take precedence over the bound method and
/// URL. Every [`controller`](Self::controller) call returns an
/// independent controller with its own state; they share the transport,
/// the cache, and (when set) the cache key.
pub struct Endpoint<T, X> {
    method: Method,
    url: String,
    config: RequestConfig,
    cache_key: Option<CacheKey>,
    cancel_previous: bool,
    transport: Arc<X>,
    cache: Arc<dyn ResponseCache>,
    _payload: PhantomData<fn() -> T>,
}

impl<T, X> Endpoint<T, X>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    X: Transport,
{
    pub fn new(method: Method, url: impl Into<String>, transport: Arc<X>) -> Self {
        Self {
            method,
            url: url.into(),
            config: RequestConfig::default(),
            cache_key: None,
            cancel_previous: false,
            transport,
            cache: MemoryCache::global(),
            _payload: PhantomData,
        }
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
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

    /// The config every controller from this endpoint starts from.
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.method, self.url.clone()).merge(&self.config)
    }

    /// A fresh controller with no parameters bound.
    pub fn controller(&self) -> RequestController<T, X> {
        self.build(self.request_config())
    }

    /// A fresh controller whose base config already carries `params`,
    /// routed into query or body by method.
    pub fn bind(&self, params: Value) -> RequestController<T, X> {
        let config = self.request_config();
        let config = normalize(config.method(), params).apply(config);
        self.build(config)
    }

    fn build(&self, config: RequestConfig) -> RequestController<T, X> {
        let controller = RequestController::new(Arc::clone(&self.transport), config)
            .with_cache(Arc::clone(&self.cache))
            .cancel_previous(self.cancel_previous);
        match self.cache_key {
            Some(ref key) => controller.with_cache_key(key.clone()),
            None => controller,
        }
    }
}

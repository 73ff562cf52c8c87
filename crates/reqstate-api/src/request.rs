// Per-request configuration and its merge semantics.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::method::Method;

/// Everything a transport needs to issue one call.
///
/// All fields are optional so a per-call override can name only what it
/// changes; [`merge`](Self::merge) layers an override on top of a base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub method: Option<Method>,
    /// Absolute URL, or a path resolved against `base_url`.
    pub url: Option<String>,
    pub base_url: Option<Url>,
    pub headers: BTreeMap<String, String>,
    /// Query-string parameters.
    pub params: Option<Value>,
    /// JSON request body.
    pub data: Option<Value>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The effective method; unset means GET.
    pub fn method(&self) -> Method {
        self.method.unwrap_or_default()
    }

    /// Layer `overrides` on top of `self`. Fields set in `overrides` win;
    /// headers are merged per name.
    pub fn merge(&self, overrides: &Self) -> Self {
        let mut headers = self.headers.clone();
        headers.extend(
            overrides
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Self {
            method: overrides.method.or(self.method),
            url: overrides.url.clone().or_else(|| self.url.clone()),
            base_url: overrides.base_url.clone().or_else(|| self.base_url.clone()),
            headers,
            params: overrides.params.clone().or_else(|| self.params.clone()),
            data: overrides.data.clone().or_else(|| self.data.clone()),
            timeout: overrides.timeout.or(self.timeout),
        }
    }

    /// Resolve the final request URL.
    ///
    /// Absolute URLs are used as-is. Relative ones are appended to
    /// `base_url` (or `fallback_base` when the config carries none),
    /// keeping the base path: `https://host/api` + `users` gives
    /// `https://host/api/users`.
    pub fn resolve_url(&self, fallback_base: Option<&Url>) -> Result<Url, crate::Error> {
        let raw = self.url.as_deref().ok_or(crate::Error::MissingUrl)?;

        if let Ok(absolute) = Url::parse(raw) {
            return Ok(absolute);
        }

        let base = self
            .base_url
            .as_ref()
            .or(fallback_base)
            .ok_or(crate::Error::MissingUrl)?;

        let full = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            raw.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }
}

// Transport capability and its reqwest-backed implementation.
//
// The controller only talks to the `Transport` trait, so tests can swap in
// a scripted transport while production uses `HttpTransport`.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cancel::CancelHandle;
use crate::error::Error;
use crate::request::RequestConfig;

/// Issues a configured call and returns the decoded response body.
///
/// Implementations must honour `cancel`: once it fires, the call resolves
/// to [`Error::Cancelled`] as soon as possible. Failed calls that still
/// carried a response body surface it through [`Error::response_body`].
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &RequestConfig,
        cancel: &CancelHandle,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate.
    DangerAcceptInvalid,
}

/// Settings for building the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("reqstate/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl HttpTransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// [`Transport`] over a shared `reqwest::Client`.
///
/// Relative request URLs resolve against `base_url`; query parameters are
/// URL-encoded from `params`, `data` is sent as a JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Option<Url>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: Option<Url>, config: &HttpTransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: Option<Url>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            timeout: HttpTransportConfig::default().timeout,
        }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    async fn exchange(&self, request: &RequestConfig) -> Result<Value, Error> {
        let method = request.method();
        let url = request.resolve_url(self.base_url.as_ref())?;
        debug!("{} {}", method.as_reqwest(), url);

        let mut builder = self.http.request(method.as_reqwest(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref params) = request.params {
            builder = builder.query(params);
        }
        if let Some(ref data) = request.data {
            builder = builder.json(data);
        }
        let timeout = request.timeout.unwrap_or(self.timeout);
        if let Some(t) = request.timeout {
            builder = builder.timeout(t);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })?;

        parse_body(resp).await
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &RequestConfig, cancel: &CancelHandle) -> Result<Value, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled {
                reason: cancel.reason().unwrap_or("cancelled").to_owned(),
            }),
            result = self.exchange(request) => result,
        }
    }
}

/// Decode a response body as JSON, turning non-2xx statuses into
/// [`Error::Status`] with whatever JSON payload came along.
async fn parse_body(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body: serde_json::from_str(&body).ok(),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

// Routes caller parameters into the query string or the body by method.

use serde_json::Value;

use reqstate_api::{Method, RequestConfig};

/// Where a call's parameters ended up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub params: Option<Value>,
    pub data: Option<Value>,
}

/// Query-style methods get `params`, body-style methods get `data`.
/// Any other method drops the parameters.
pub fn normalize(method: Method, params: Value) -> Normalized {
    if method.carries_query() {
        Normalized {
            params: Some(params),
            data: None,
        }
    } else if method.carries_body() {
        Normalized {
            params: None,
            data: Some(params),
        }
    } else {
        Normalized::default()
    }
}

impl Normalized {
    /// Write the populated side into `config`, leaving the other untouched.
    pub fn apply(self, mut config: RequestConfig) -> RequestConfig {
        if let Some(params) = self.params {
            config.params = Some(params);
        }
        if let Some(data) = self.data {
            config.data = Some(data);
        }
        config
    }
}

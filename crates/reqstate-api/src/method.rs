// HTTP methods understood by the request layer.
//
// Parsing is case-insensitive and accepts `option` as an alias for
// `options`, matching what callers write in request configs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// HTTP method of a request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Delete,
    Head,
    #[strum(to_string = "options", serialize = "option")]
    #[serde(alias = "option")]
    Options,
    Post,
    Put,
    Patch,
    Trace,
    Connect,
}

impl Method {
    /// Methods whose parameters travel in the query string.
    pub fn carries_query(self) -> bool {
        matches!(self, Self::Get | Self::Delete | Self::Head | Self::Options)
    }

    /// Methods whose parameters travel as a JSON body.
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Trace => reqwest::Method::TRACE,
            Self::Connect => reqwest::Method::CONNECT,
        }
    }
}

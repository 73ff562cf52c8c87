// Response body convention shared by every endpoint: `{ code, data }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code signalling logical success.
pub const SUCCESS_CODE: &str = "000";

/// The `{ code, data }` wrapper every endpoint answers with.
///
/// Only `code == "000"` is a logical success; anything else, including a
/// missing code, is a failure regardless of the HTTP status.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T = Value> {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code.as_deref() == Some(SUCCESS_CODE)
    }
}

impl Envelope<Value> {
    /// Read the envelope fields out of a raw JSON body without consuming it.
    ///
    /// Returns `None` when the body is not a JSON object.
    pub fn peek(body: &Value) -> Option<Envelope<&Value>> {
        let obj = body.as_object()?;
        Some(Envelope {
            code: obj.get("code").and_then(Value::as_str).map(str::to_owned),
            data: obj.get("data"),
        })
    }
}

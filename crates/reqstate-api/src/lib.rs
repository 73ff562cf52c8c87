// reqstate-api: HTTP transport capability consumed by the request controller.

pub mod cancel;
pub mod envelope;
pub mod error;
pub mod method;
pub mod request;
pub mod transport;

pub use cancel::CancelHandle;
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::Error;
pub use method::Method;
pub use request::RequestConfig;
pub use transport::{HttpTransport, HttpTransportConfig, TlsMode, Transport};

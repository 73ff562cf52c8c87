// reqstate-core: Stateful request layer between a transport and its consumers.

pub mod cache;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod guard;
pub mod normalize;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheKey, MemoryCache, ResponseCache};
pub use controller::{CANCEL_PREVIOUS_REASON, RequestController};
pub use endpoint::Endpoint;
pub use error::RequestError;
pub use normalize::{Normalized, normalize};
pub use store::{Action, RequestState, StateStore};
pub use stream::StateStream;

// Transport-side types consumers need to configure a controller.
pub use reqstate_api::{CancelHandle, Envelope, Method, RequestConfig, Transport};

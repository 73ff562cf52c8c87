// ── Request state store ──
//
// Reducer-style `{loading, error, data}` container with push-based
// change notification.

mod state;
mod state_store;

pub use state::{Action, RequestState};
pub use state_store::StateStore;

// Owns one `RequestState` and broadcasts every transition through a
// `watch` channel.

use tokio::sync::watch;

use super::state::{Action, RequestState};
use crate::stream::StateStream;

/// Reactive container for a single [`RequestState`].
///
/// Mutations go through [`dispatch`](Self::dispatch) only. The new state is
/// visible to [`snapshot`](Self::snapshot) and to every subscriber as soon
/// as `dispatch` returns.
pub struct StateStore<T: Clone + Send + Sync + 'static> {
    state: watch::Sender<RequestState<T>>,
}

impl<T: Clone + Send + Sync + 'static> StateStore<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self { state }
    }

    /// Apply `action` and notify subscribers.
    pub fn dispatch(&self, action: Action<T>) {
        // send_modify updates even with zero receivers, unlike send().
        self.state.send_modify(|state| {
            let next = state.reduce(action);
            *state = next;
        });
    }

    /// The current state (cloned).
    pub fn snapshot(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<T> {
        StateStream::new(self.state.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for StateStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

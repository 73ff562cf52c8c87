// ── State subscriptions ──
//
// Read side of a `StateStore`: a receiver that remembers the last state it
// handed out, and a `Stream` form for combinator-style consumers.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::RequestState;

/// Follows one controller's [`RequestState`].
///
/// Dispatches are coalesced: a subscriber that falls behind wakes once and
/// sees only the newest state, never a queue of intermediate ones.
pub struct StateStream<T: Clone + Send + Sync + 'static> {
    current: RequestState<T>,
    receiver: watch::Receiver<RequestState<T>>,
}

impl<T: Clone + Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<RequestState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Last state this subscriber observed.
    pub fn current(&self) -> &RequestState<T> {
        &self.current
    }

    /// Suspend until the store dispatches again.
    ///
    /// `None` means the store is gone and no further states will arrive.
    pub async fn changed(&mut self) -> Option<RequestState<T>> {
        self.receiver.changed().await.ok()?;
        self.current = self.receiver.borrow_and_update().clone();
        Some(self.current.clone())
    }

    /// Yields the state at subscription time, then one item per wake-up.
    pub fn into_stream(self) -> StateWatchStream<T> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

pub struct StateWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<RequestState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = RequestState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

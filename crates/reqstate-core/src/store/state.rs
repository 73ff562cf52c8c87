use crate::error::RequestError;

/// Observable state of one logical request slot.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    pub loading: bool,
    pub error: Option<RequestError>,
    pub data: Option<T>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

/// A state transition. Each kind overwrites exactly one field.
#[derive(Debug, Clone)]
pub enum Action<T> {
    Loading(bool),
    Error(RequestError),
    Data(Option<T>),
}

impl<T: Clone> RequestState<T> {
    /// Pure transition: copy `self`, overwrite the field named by `action`.
    pub fn reduce(&self, action: Action<T>) -> Self {
        let mut next = self.clone();
        match action {
            Action::Loading(loading) => next.loading = loading,
            Action::Error(error) => next.error = Some(error),
            Action::Data(data) => next.data = data,
        }
        next
    }
}

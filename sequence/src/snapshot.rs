use std::rc::Rc;

use log::warn;

use crate::{Capabilities, Listener, ListenerId, ObservableSequence, Sequence};

/// An immutable sequence, for example the result of a one off query.
///
/// A snapshot never changes and therefore reports only [`Capabilities::INDEXED`]. Listeners are
/// accepted but never invoked.
#[derive(Debug, Clone)]
pub struct Snapshot<T>(Rc<[T]>);

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items.into())
    }
}

impl<T: Clone> Sequence<T> for Snapshot<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.0.get(index).cloned()
    }

    fn to_vec(&self) -> Vec<T> {
        self.0.to_vec()
    }
}

impl<T: Clone> ObservableSequence<T> for Snapshot<T> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::INDEXED
    }

    fn subscribe(&self, _listener: Listener<T>) -> ListenerId {
        warn!("subscribing to a snapshot, no changes will ever be reported");
        ListenerId::DETACHED
    }

    fn unsubscribe(&self, _id: ListenerId) -> bool {
        false
    }
}

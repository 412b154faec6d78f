use std::rc::Rc;

use bitflags::bitflags;

use crate::{Listener, ListenerId};

bitflags! {
    /// What a sequence is able to provide to its consumers.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Items can be read by index and the length is known.
        const INDEXED = 0x01;
        /// Listeners are notified about every mutation.
        const OBSERVABLE = 0x02;
    }
}

/// Indexed read access to the current contents of an ordered sequence.
pub trait Sequence<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A clone of the item at `index`, `None` if out of bounds.
    fn get(&self, index: usize) -> Option<T>;

    fn to_vec(&self) -> Vec<T>;
}

/// An ordered sequence that reports its mutations.
///
/// Listeners are invoked synchronously after the contents reflect the change. Mutating the
/// sequence from inside one of its listeners is not allowed.
pub trait ObservableSequence<T>: Sequence<T> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn subscribe(&self, listener: Listener<T>) -> ListenerId;

    /// Returns `false` if the listener was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Compares two shared sequences by address, ignoring trait object metadata.
pub fn same_sequence<T>(
    a: &Rc<dyn ObservableSequence<T>>,
    b: &Rc<dyn ObservableSequence<T>>,
) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

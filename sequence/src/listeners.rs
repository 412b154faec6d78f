use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use derive_more::Deref;

use crate::SequenceChange;

pub type Listener<T> = Rc<dyn Fn(&SequenceChange<T>)>;

/// Identifies a listener registration.
///
/// Ids are never reused within one registry, so a stale id can not detach a later registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deref)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returned by sequences that never notify. Registries never hand it out.
    pub const DETACHED: Self = Self(u64::MAX);
}

/// The set of listeners of one sequence.
pub struct ListenerRegistry<T> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<T> ListenerRegistry<T> {
    pub fn subscribe(&self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered (anymore).
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let len_before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != len_before
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `change` to every listener registered at the time of the call, in registration
    /// order.
    ///
    /// Listeners may subscribe or unsubscribe while being notified. Such changes take effect with
    /// the next notification.
    pub fn notify(&self, change: &SequenceChange<T>) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(change);
        }
    }
}

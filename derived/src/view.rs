use std::rc::Rc;

use tandem_sequence::{
    Listener, ListenerId, ObservableSequence, ObservableVec, Sequence, SequenceWriter,
    WriteError,
};

/// Read access to the output of a derived sequence.
///
/// Views are cheap to clone and stay valid after the derived sequence is dropped (they are empty
/// then). Writes are rejected, the contents are maintained exclusively by the engine.
#[derive(Debug)]
pub struct DerivedView<T>(Rc<ObservableVec<T>>);

impl<T> Clone for DerivedView<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone> DerivedView<T> {
    pub(crate) fn new(output: Rc<ObservableVec<T>>) -> Self {
        Self(output)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.0.get(index)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.to_vec()
    }

    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.0.with_items(f)
    }

    /// The view as a source for another derived sequence.
    ///
    /// All calls return the same sequence, so rebinding a downstream sequence to it is a no-op.
    pub fn as_source(&self) -> Rc<dyn ObservableSequence<T>>
    where
        T: 'static,
    {
        self.0.clone()
    }
}

impl<T: Clone> Sequence<T> for DerivedView<T> {
    fn len(&self) -> usize {
        DerivedView::len(self)
    }

    fn get(&self, index: usize) -> Option<T> {
        DerivedView::get(self, index)
    }

    fn to_vec(&self) -> Vec<T> {
        DerivedView::to_vec(self)
    }
}

impl<T: Clone> ObservableSequence<T> for DerivedView<T> {
    fn subscribe(&self, listener: Listener<T>) -> ListenerId {
        self.0.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.0.unsubscribe(id)
    }
}

impl<T> SequenceWriter<T> for DerivedView<T> {
    fn try_insert(&self, _index: usize, _item: T) -> Result<(), WriteError> {
        Err(WriteError::NotSupported)
    }

    fn try_remove(&self, _index: usize) -> Result<T, WriteError> {
        Err(WriteError::NotSupported)
    }

    fn try_replace(&self, _index: usize, _item: T) -> Result<T, WriteError> {
        Err(WriteError::NotSupported)
    }

    fn try_clear(&self) -> Result<(), WriteError> {
        Err(WriteError::NotSupported)
    }
}

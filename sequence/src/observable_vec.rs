use std::{cell::RefCell, mem, ops::Range};

use log::trace;

use crate::{
    Listener, ListenerId, ListenerRegistry, ObservableSequence, Sequence, SequenceChange,
    SequenceWriter, WriteError,
};

/// A vector that notifies its listeners about every mutation.
///
/// Each mutating method emits exactly one [`SequenceChange`], after the contents have been
/// updated. Index arguments out of range panic, like the corresponding `Vec` methods. For checked
/// writes, use the [`SequenceWriter`] surface.
#[derive(Debug)]
pub struct ObservableVec<T> {
    items: RefCell<Vec<T>>,
    listeners: ListenerRegistry<T>,
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            listeners: ListenerRegistry::default(),
        }
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            listeners: ListenerRegistry::default(),
        }
    }
}

impl<T: Clone> ObservableVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    /// Runs `f` with a borrow of the current contents.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    pub fn insert(&self, index: usize, item: T) {
        self.insert_many(index, vec![item]);
    }

    /// Inserts `items` so that the first one ends up at `index`. Emits nothing if `items` is
    /// empty.
    pub fn insert_many(&self, index: usize, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        self.items
            .borrow_mut()
            .splice(index..index, items.iter().cloned());
        self.notify(SequenceChange::Insert { index, items });
    }

    pub fn push(&self, item: T) {
        self.insert(self.len(), item);
    }

    pub fn extend(&self, items: Vec<T>) {
        self.insert_many(self.len(), items);
    }

    pub fn remove(&self, index: usize) -> T {
        let item = self.items.borrow_mut().remove(index);
        self.notify(SequenceChange::Remove {
            index,
            items: vec![item.clone()],
        });
        item
    }

    /// Removes a contiguous range. Emits nothing if the range is empty.
    pub fn remove_range(&self, range: Range<usize>) -> Vec<T> {
        let index = range.start;
        let items: Vec<T> = self.items.borrow_mut().drain(range).collect();
        if !items.is_empty() {
            self.notify(SequenceChange::Remove {
                index,
                items: items.clone(),
            });
        }
        items
    }

    /// Overwrites the item at `index` and returns the previous one.
    pub fn replace(&self, index: usize, item: T) -> T {
        let old = mem::replace(&mut self.items.borrow_mut()[index], item.clone());
        self.notify(SequenceChange::Replace {
            index,
            old: old.clone(),
            new: item,
        });
        old
    }

    /// Replaces all contents and emits a [`SequenceChange::Reset`].
    pub fn reset(&self, items: Vec<T>) -> Vec<T> {
        let previous = mem::replace(&mut *self.items.borrow_mut(), items);
        self.notify(SequenceChange::Reset);
        previous
    }

    pub fn clear(&self) -> Vec<T> {
        self.reset(Vec::new())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, change: SequenceChange<T>) {
        trace!(
            "sequence {:?} {:?}, {} listener(s)",
            change.kind(),
            change.range(),
            self.listeners.len()
        );
        self.listeners.notify(&change);
    }
}

impl<T: Clone> Sequence<T> for ObservableVec<T> {
    fn len(&self) -> usize {
        ObservableVec::len(self)
    }

    fn get(&self, index: usize) -> Option<T> {
        ObservableVec::get(self, index)
    }

    fn to_vec(&self) -> Vec<T> {
        ObservableVec::to_vec(self)
    }
}

impl<T: Clone> ObservableSequence<T> for ObservableVec<T> {
    fn subscribe(&self, listener: Listener<T>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<T: Clone> SequenceWriter<T> for ObservableVec<T> {
    fn try_insert(&self, index: usize, item: T) -> Result<(), WriteError> {
        let len = self.len();
        if index > len {
            return Err(WriteError::OutOfBounds { index, len });
        }
        self.insert(index, item);
        Ok(())
    }

    fn try_remove(&self, index: usize) -> Result<T, WriteError> {
        let len = self.len();
        if index >= len {
            return Err(WriteError::OutOfBounds { index, len });
        }
        Ok(self.remove(index))
    }

    fn try_replace(&self, index: usize, item: T) -> Result<T, WriteError> {
        let len = self.len();
        if index >= len {
            return Err(WriteError::OutOfBounds { index, len });
        }
        Ok(self.replace(index, item))
    }

    fn try_clear(&self) -> Result<(), WriteError> {
        self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ChangeRecorder;

    #[test]
    fn mutations_emit_one_change_each() {
        let vec = Rc::new(ObservableVec::from(vec![1, 2, 3]));
        let recorder = ChangeRecorder::attach(vec.clone());

        vec.push(4);
        vec.insert_many(0, vec![8, 9]);
        vec.remove(1);
        vec.replace(0, 7);
        vec.remove_range(1..3);

        assert_eq!(vec.to_vec(), [7, 3, 4]);
        assert_eq!(
            recorder.take_all(),
            [
                SequenceChange::Insert {
                    index: 3,
                    items: vec![4]
                },
                SequenceChange::Insert {
                    index: 0,
                    items: vec![8, 9]
                },
                SequenceChange::Remove {
                    index: 1,
                    items: vec![9]
                },
                SequenceChange::Replace {
                    index: 0,
                    old: 8,
                    new: 7
                },
                SequenceChange::Remove {
                    index: 1,
                    items: vec![1, 2]
                },
            ]
        );
    }

    #[test]
    fn empty_batches_are_silent() {
        let vec = Rc::new(ObservableVec::from(vec![1]));
        let recorder = ChangeRecorder::attach(vec.clone());

        vec.insert_many(0, Vec::new());
        vec.remove_range(1..1);

        assert!(recorder.take_all().is_empty());
    }

    #[test]
    fn listeners_see_the_mutated_contents() {
        let vec = Rc::new(ObservableVec::from(vec![1, 2]));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&vec);
        let s = seen.clone();
        vec.subscribe(Rc::new(move |_| {
            if let Some(vec) = weak.upgrade() {
                s.borrow_mut().push(vec.to_vec());
            }
        }));

        vec.push(3);
        vec.reset(vec![5]);

        assert_eq!(*seen.borrow(), [vec![1, 2, 3], vec![5]]);
    }

    #[test]
    fn checked_writes_report_bounds() {
        let vec = ObservableVec::from(vec![1, 2]);

        assert_eq!(
            vec.try_insert(3, 0),
            Err(WriteError::OutOfBounds { index: 3, len: 2 })
        );
        assert_eq!(
            vec.try_remove(2),
            Err(WriteError::OutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(vec.try_replace(1, 5), Ok(2));
        assert_eq!(vec.try_insert(2, 6), Ok(()));
        assert_eq!(vec.to_vec(), [1, 5, 6]);
        assert_eq!(vec.try_clear(), Ok(()));
        assert!(vec.is_empty());
    }

    #[test]
    #[should_panic]
    fn out_of_range_remove_panics() {
        let vec = ObservableVec::from(vec![1]);
        vec.remove(1);
    }
}

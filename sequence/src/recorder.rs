use std::{cell::RefCell, mem, ops::DerefMut, rc::Rc};

use crate::{ObservableSequence, SequenceChange};

/// Records every change a sequence reports until dropped.
pub struct ChangeRecorder<T> {
    changes: Rc<RefCell<Vec<SequenceChange<T>>>>,
    detach: Option<Box<dyn FnOnce()>>,
}

impl<T: Clone + 'static> ChangeRecorder<T> {
    pub fn attach<S>(sequence: Rc<S>) -> Self
    where
        S: ObservableSequence<T> + ?Sized + 'static,
    {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let recorded = changes.clone();
        let id = sequence.subscribe(Rc::new(move |change: &SequenceChange<T>| {
            recorded.borrow_mut().push(change.clone())
        }));

        Self {
            changes,
            detach: Some(Box::new(move || {
                sequence.unsubscribe(id);
            })),
        }
    }
}

impl<T> ChangeRecorder<T> {
    pub fn take_all(&self) -> Vec<SequenceChange<T>> {
        mem::take(self.changes.borrow_mut().deref_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.borrow().is_empty()
    }
}

impl<T> Drop for ChangeRecorder<T> {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObservableVec;

    #[test]
    fn take_all_drains() {
        let vec = Rc::new(ObservableVec::<u8>::new());
        let recorder = ChangeRecorder::attach(vec.clone());

        vec.push(1);
        assert_eq!(recorder.take_all().len(), 1);
        assert!(recorder.is_empty());
    }

    #[test]
    fn drop_detaches() {
        let vec = Rc::new(ObservableVec::<u8>::new());
        let recorder = ChangeRecorder::attach(vec.clone());
        assert_eq!(vec.listener_count(), 1);

        drop(recorder);
        assert_eq!(vec.listener_count(), 0);
    }
}

use tandem_sequence::ObservableVec;

use crate::settings::NotificationBatching;

/// Forwards insertions to the derived sequence, batching contiguous ones into a single `Insert`
/// when configured.
///
/// Insertion indices are computed against the tracker, which already contains the pending items.
/// A pending run is therefore flushed before an item that does not extend it is queued, so the
/// derived sequence always catches up with the tracker in order.
pub(crate) struct InsertEmitter<'a, T: Clone> {
    output: &'a ObservableVec<T>,
    batching: NotificationBatching,
    run: Option<(usize, Vec<T>)>,
}

impl<'a, T: Clone> InsertEmitter<'a, T> {
    pub fn new(output: &'a ObservableVec<T>, batching: NotificationBatching) -> Self {
        Self {
            output,
            batching,
            run: None,
        }
    }

    pub fn push(&mut self, index: usize, item: T) {
        if self.batching == NotificationBatching::PerItem {
            self.output.insert(index, item);
            return;
        }

        if let Some((start, items)) = &mut self.run {
            if index == *start + items.len() {
                items.push(item);
                return;
            }
            if index == *start {
                items.insert(0, item);
                return;
            }
        }

        self.flush();
        self.run = Some((index, vec![item]));
    }

    /// Must be called when done, pending items are not flushed on drop.
    pub fn finish(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        if let Some((start, items)) = self.run.take() {
            self.output.insert_many(start, items);
        }
    }
}

//! Bookkeeping that maps derived positions back to the source items that produced them.
//!
//! Entries are kept in derived order and remember the source position of their item. Source
//! positions are shifted whenever the source grows or shrinks in front of them, so every source
//! side event can be translated into a derived position without looking at the derived sequence
//! itself.
//!
//! In mirror mode, entries are strictly ascending by source position, which makes the translation
//! a binary search. In sorted mode, entries are ordered by the comparator and a source position is
//! found by scanning.
use std::{cmp, ops::Range};

use crate::{error::invariant_violation, settings::InsertionSearch};

#[derive(Debug, Clone)]
pub(crate) struct Entry<S> {
    pub source_index: usize,
    pub item: S,
}

impl<S> Entry<S> {
    pub fn new(source_index: usize, item: S) -> Self {
        Self { source_index, item }
    }
}

#[derive(Debug)]
pub(crate) struct CorrespondenceTracker<S> {
    entries: Vec<Entry<S>>,
    /// Length of the source as far as the processed notifications tell.
    source_len: usize,
}

impl<S> Default for CorrespondenceTracker<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            source_len: 0,
        }
    }
}

impl<S> CorrespondenceTracker<S> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.source_len = 0;
    }

    /// Makes room for `count` new source items at `index`.
    pub fn open_source_range(&mut self, index: usize, count: usize) {
        if index > self.source_len {
            invariant_violation(format!(
                "insert at source index {index}, but the source has {} items",
                self.source_len
            ));
        }
        for entry in &mut self.entries {
            if entry.source_index >= index {
                entry.source_index += count;
            }
        }
        self.source_len += count;
    }

    /// Closes the gap of removed source items. Their entries must have been removed before.
    pub fn close_source_range(&mut self, range: Range<usize>) {
        self.check_source_range(&range);
        let count = range.len();
        for entry in &mut self.entries {
            if range.contains(&entry.source_index) {
                invariant_violation(format!(
                    "source index {} is still tracked after its removal",
                    entry.source_index
                ));
            }
            if entry.source_index >= range.end {
                entry.source_index -= count;
            }
        }
        self.source_len -= count;
    }

    pub fn check_source_range(&self, range: &Range<usize>) {
        if range.start > range.end || range.end > self.source_len {
            invariant_violation(format!(
                "source range {range:?} is outside of the {} tracked source items",
                self.source_len
            ));
        }
    }

    /// Mirror mode: `Ok(derived_index)` if the source position is represented, otherwise
    /// `Err(derived_index)` where an item from that source position belongs.
    ///
    /// The derived index of an unrepresented position is one past the nearest preceding
    /// represented position, or 0 if there is none.
    pub fn mirror_slot(&self, source_index: usize) -> Result<usize, usize> {
        self.entries
            .binary_search_by_key(&source_index, |entry| entry.source_index)
    }

    /// Mirror mode: the derived range that represents the source range.
    pub fn mirror_span(&self, source_range: &Range<usize>) -> Range<usize> {
        let start = self
            .entries
            .partition_point(|entry| entry.source_index < source_range.start);
        let end = self
            .entries
            .partition_point(|entry| entry.source_index < source_range.end);
        start..end
    }

    /// Sorted mode: the derived index of the source position, if it is represented.
    pub fn find(&self, source_index: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.source_index == source_index)
    }

    /// Sorted mode: the position at which `item` is inserted so that entries stay ascending and
    /// `item` ends up behind all entries that compare equal to it.
    pub fn insertion_point(
        &self,
        item: &S,
        compare: impl Fn(&S, &S) -> cmp::Ordering,
        search: InsertionSearch,
    ) -> usize {
        match search {
            InsertionSearch::Binary => self
                .entries
                .partition_point(|entry| compare(&entry.item, item) != cmp::Ordering::Greater),
            InsertionSearch::Linear => self
                .entries
                .iter()
                .position(|entry| compare(&entry.item, item) == cmp::Ordering::Greater)
                .unwrap_or(self.entries.len()),
        }
    }

    pub fn insert(&mut self, index: usize, entry: Entry<S>) {
        self.entries.insert(index, entry);
    }

    pub fn insert_many(&mut self, index: usize, entries: impl IntoIterator<Item = Entry<S>>) {
        self.entries.splice(index..index, entries);
    }

    pub fn remove(&mut self, index: usize) -> Entry<S> {
        self.entries.remove(index)
    }

    pub fn remove_span(&mut self, range: Range<usize>) -> Vec<Entry<S>> {
        self.entries.drain(range).collect()
    }

    pub fn replace(&mut self, index: usize, item: S) -> S {
        std::mem::replace(&mut self.entries[index].item, item)
    }

    /// Mirror mode: entries are strictly ascending by source position and within bounds.
    pub fn verify_mirror(&self) {
        for pair in self.entries.windows(2) {
            if pair[0].source_index >= pair[1].source_index {
                invariant_violation(format!(
                    "mirror order broken at source indices {} and {}",
                    pair[0].source_index, pair[1].source_index
                ));
            }
        }
        self.verify_bounds();
    }

    /// Sorted mode: entries are ascending under `compare`, every source position appears once.
    pub fn verify_sorted(&self, compare: impl Fn(&S, &S) -> cmp::Ordering) {
        for (i, pair) in self.entries.windows(2).enumerate() {
            if compare(&pair[0].item, &pair[1].item) == cmp::Ordering::Greater {
                invariant_violation(format!("sorted order broken at derived index {i}"));
            }
        }
        let mut indices: Vec<usize> = self.entries.iter().map(|e| e.source_index).collect();
        indices.sort_unstable();
        if indices.windows(2).any(|pair| pair[0] == pair[1]) {
            invariant_violation("a source index is tracked more than once");
        }
        self.verify_bounds();
    }

    fn verify_bounds(&self) {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.source_index >= self.source_len)
        {
            invariant_violation(format!(
                "tracked source index {} is outside of the {} source items",
                entry.source_index, self.source_len
            ));
        }
    }
}

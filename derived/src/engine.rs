use std::{
    cell::{Cell, RefCell},
    ops::Range,
    rc::Rc,
};

use log::{debug, trace, warn};
use tandem_sequence::{
    Capabilities, Listener, ListenerId, ObservableSequence, ObservableVec, SequenceChange,
    same_sequence,
};

use crate::{
    BindError, EngineSettings, Filter, OrderingMode, OrderingPolicy, Projection,
    emitter::InsertEmitter,
    error::invariant_violation,
    tracker::{CorrespondenceTracker, Entry},
};

const REQUIRED: Capabilities = Capabilities::INDEXED.union(Capabilities::OBSERVABLE);

struct Binding<S> {
    sequence: Rc<dyn ObservableSequence<S>>,
    listener: ListenerId,
}

/// The part of the engine state that stays readable while the engine processes a change.
///
/// Borrows are never held across a notification.
pub(crate) struct Status<S> {
    binding: RefCell<Option<Binding<S>>>,
    mode: Cell<OrderingMode>,
}

impl<S> Status<S> {
    fn new(mode: OrderingMode) -> Self {
        Self {
            binding: RefCell::new(None),
            mode: Cell::new(mode),
        }
    }

    pub fn source(&self) -> Option<Rc<dyn ObservableSequence<S>>> {
        self.binding
            .borrow()
            .as_ref()
            .map(|binding| binding.sequence.clone())
    }

    pub fn mode(&self) -> OrderingMode {
        self.mode.get()
    }

    /// Unsubscribes from the source. Returns `false` if there was none.
    pub fn detach(&self) -> bool {
        let Some(binding) = self.binding.borrow_mut().take() else {
            return false;
        };
        if !binding.sequence.unsubscribe(binding.listener) {
            warn!("Source did not know the listener of its derived sequence");
        }
        debug!("Detached from source");
        true
    }

    fn attach(&self, sequence: Rc<dyn ObservableSequence<S>>, listener: ListenerId) {
        *self.binding.borrow_mut() = Some(Binding { sequence, listener });
    }
}

/// The state behind a derived sequence.
///
/// Every public entry point runs to completion and leaves tracker, derived sequence and source in
/// agreement. Disagreement is detected right after each processed change and is fatal.
pub(crate) struct Engine<S, T> {
    projection: Projection<S, T>,
    filter: Option<Filter<S>>,
    policy: OrderingPolicy<S>,
    settings: EngineSettings,
    status: Rc<Status<S>>,
    tracker: CorrespondenceTracker<S>,
    output: Rc<ObservableVec<T>>,
}

impl<S, T: Clone> Engine<S, T> {
    /// Detaches from the source and clears the derived sequence.
    pub fn unbind(&mut self) {
        if self.status.detach() {
            self.clear();
        }
    }

    fn clear(&mut self) {
        self.tracker.clear();
        self.output.clear();
    }
}

impl<S: Clone + 'static, T: Clone + 'static> Engine<S, T> {
    pub fn new(
        projection: Projection<S, T>,
        filter: Option<Filter<S>>,
        policy: OrderingPolicy<S>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            projection,
            filter,
            status: Rc::new(Status::new(policy.mode())),
            policy,
            settings,
            tracker: CorrespondenceTracker::default(),
            output: Rc::new(ObservableVec::new()),
        }
    }

    pub fn output(&self) -> &Rc<ObservableVec<T>> {
        &self.output
    }

    pub fn status(&self) -> &Rc<Status<S>> {
        &self.status
    }

    /// Binds to `source`, replaying all its items.
    ///
    /// Binding the current source again does nothing. A source that can not be indexed and
    /// observed is rejected before anything changes. `listener` is only invoked when a new
    /// source is actually attached.
    pub fn bind(
        &mut self,
        source: Option<Rc<dyn ObservableSequence<S>>>,
        listener: impl FnOnce() -> Listener<S>,
    ) -> Result<(), BindError> {
        let unchanged = match (&source, self.status.source()) {
            (Some(source), Some(current)) => same_sequence(source, &current),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        if let Some(source) = &source {
            let missing = REQUIRED.difference(source.capabilities());
            if !missing.is_empty() {
                return Err(BindError::InvalidSourceType { missing });
            }
        }

        self.status.detach();
        self.clear();

        if let Some(sequence) = source {
            let listener = sequence.subscribe(listener());
            debug!(
                "Binding source with {} items ({:?})",
                sequence.len(),
                self.policy.mode()
            );
            self.status.attach(sequence, listener);
            self.replay();
        }

        Ok(())
    }

    /// Forgets everything and replays the current source. Equivalent to a fresh bind.
    pub fn rebuild(&mut self) {
        self.clear();
        self.replay();
    }

    pub fn set_filter(&mut self, filter: Option<Filter<S>>) {
        debug!("Filter {}", if filter.is_some() { "set" } else { "removed" });
        self.filter = filter;
        self.rebuild();
    }

    pub fn set_policy(&mut self, policy: OrderingPolicy<S>) {
        debug!("Ordering changed from {:?} to {:?}", self.policy, policy);
        self.status.mode.set(policy.mode());
        self.policy = policy;
        self.rebuild();
    }

    /// Processes one notification of the bound source.
    pub fn apply(&mut self, change: &SequenceChange<S>) {
        trace!("Source {:?} {:?}", change.kind(), change.range());
        match change {
            SequenceChange::Insert { index, items } => self.handle_insert(*index, items),
            SequenceChange::Remove { index, items } => {
                self.handle_remove(*index..*index + items.len())
            }
            SequenceChange::Replace { index, new, .. } => self.handle_replace(*index, new),
            SequenceChange::Reset => self.rebuild(),
        }
        self.check_consistency();
    }

    fn replay(&mut self) {
        let Some(sequence) = self.status.source() else {
            return;
        };
        let items = sequence.to_vec();
        self.handle_insert(0, &items);
        self.check_consistency();
    }

    fn qualifies(&self, item: &S) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(item))
    }

    fn handle_insert(&mut self, index: usize, items: &[S]) {
        self.tracker.open_source_range(index, items.len());

        let mut entries: Vec<Entry<S>> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.qualifies(item))
            .map(|(offset, item)| Entry::new(index + offset, item.clone()))
            .collect();
        if entries.is_empty() {
            return;
        }

        let mut emitter = InsertEmitter::new(&self.output, self.settings.notifications);
        match &self.policy {
            OrderingPolicy::Mirror => {
                // Consecutive source items land consecutively behind the nearest preceding
                // represented item.
                let at = match self.tracker.mirror_slot(index) {
                    Err(at) => at,
                    Ok(at) => invariant_violation(format!(
                        "freshly inserted source index {index} is already tracked at {at}"
                    )),
                };
                for (offset, entry) in entries.iter().enumerate() {
                    emitter.push(at + offset, (self.projection)(&entry.item));
                }
                self.tracker.insert_many(at, entries);
            }
            OrderingPolicy::Sorted(compare) if self.tracker.is_empty() => {
                // Stable sorting in arrival order places ties exactly like inserting one by one.
                entries.sort_by(|a, b| compare(&a.item, &b.item));
                for (at, entry) in entries.iter().enumerate() {
                    emitter.push(at, (self.projection)(&entry.item));
                }
                self.tracker.insert_many(0, entries);
            }
            OrderingPolicy::Sorted(compare) => {
                for entry in entries {
                    let at = self
                        .tracker
                        .insertion_point(&entry.item, &**compare, self.settings.search);
                    emitter.push(at, (self.projection)(&entry.item));
                    self.tracker.insert(at, entry);
                }
            }
        }
        emitter.finish();
    }

    fn handle_remove(&mut self, range: Range<usize>) {
        self.tracker.check_source_range(&range);

        match &self.policy {
            OrderingPolicy::Mirror => {
                let span = self.tracker.mirror_span(&range);
                if !span.is_empty() {
                    self.tracker.remove_span(span.clone());
                    self.output.remove_range(span);
                }
            }
            OrderingPolicy::Sorted(_) => {
                for source_index in range.clone() {
                    // Never represented: nothing to do.
                    if let Some(at) = self.tracker.find(source_index) {
                        self.tracker.remove(at);
                        self.output.remove(at);
                    }
                }
            }
        }

        self.tracker.close_source_range(range);
    }

    fn handle_replace(&mut self, index: usize, new: &S) {
        self.tracker.check_source_range(&(index..index + 1));

        let previous = match &self.policy {
            OrderingPolicy::Mirror => self.tracker.mirror_slot(index).ok(),
            OrderingPolicy::Sorted(_) => self.tracker.find(index),
        };

        match (previous, self.qualifies(new)) {
            (None, false) => {}
            (Some(at), false) => {
                self.tracker.remove(at);
                self.output.remove(at);
            }
            (None, true) => {
                let at = match &self.policy {
                    OrderingPolicy::Mirror => match self.tracker.mirror_slot(index) {
                        Err(at) => at,
                        Ok(at) => invariant_violation(format!(
                            "replaced source index {index} appeared at {at}"
                        )),
                    },
                    OrderingPolicy::Sorted(compare) => {
                        self.tracker
                            .insertion_point(new, &**compare, self.settings.search)
                    }
                };
                self.tracker.insert(at, Entry::new(index, new.clone()));
                self.output.insert(at, (self.projection)(new));
            }
            (Some(at), true) => match &self.policy {
                // Replace never reorders the source, so the mirror position stays.
                OrderingPolicy::Mirror => {
                    self.tracker.replace(at, new.clone());
                    self.output.replace(at, (self.projection)(new));
                }
                OrderingPolicy::Sorted(compare) => {
                    let compare = compare.clone();
                    self.tracker.remove(at);
                    let to = self
                        .tracker
                        .insertion_point(new, &*compare, self.settings.search);
                    self.tracker.insert(to, Entry::new(index, new.clone()));

                    let value = (self.projection)(new);
                    if to == at {
                        self.output.replace(at, value);
                    } else {
                        self.output.remove(at);
                        self.output.insert(to, value);
                    }
                }
            },
        }
    }

    fn check_consistency(&self) {
        if self.tracker.len() != self.output.len() {
            invariant_violation(format!(
                "{} tracked items, but the derived sequence holds {}",
                self.tracker.len(),
                self.output.len()
            ));
        }

        if let Some(sequence) = self.status.source() {
            let source_len = sequence.len();
            if source_len != self.tracker.source_len() {
                invariant_violation(format!(
                    "the source holds {source_len} items, but its notifications account for {}",
                    self.tracker.source_len()
                ));
            }
        }

        if self.settings.audit {
            match &self.policy {
                OrderingPolicy::Mirror => self.tracker.verify_mirror(),
                OrderingPolicy::Sorted(compare) => self.tracker.verify_sorted(&**compare),
            }
        }
    }
}

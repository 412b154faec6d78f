use std::{
    cell::RefCell,
    cmp,
    rc::{Rc, Weak},
};

use log::debug;
use tandem_sequence::{Listener, ObservableSequence, SequenceChange};

use crate::{
    BindError, Comparator, DerivedView, EngineSettings, Filter, OrderingMode, OrderingPolicy,
    Projection,
    engine::{Engine, Status},
};

/// A sequence derived from an observable source: filtered, projected, and either in source order
/// or sorted.
///
/// The derived contents are readable through [`DerivedSequence::view`] (or the shortcuts on this
/// type) and report their own changes, so derived sequences can be chained.
///
/// Dropping a derived sequence unbinds it from its source.
///
/// The queries (`source`, `mode`, contents, ...) may be used from inside notifications of the
/// derived sequence. Anything that changes it may not.
pub struct DerivedSequence<S, T: Clone> {
    engine: Rc<RefCell<Engine<S, T>>>,
    status: Rc<Status<S>>,
    settings: EngineSettings,
    view: DerivedView<T>,
}

impl<S: Clone + 'static, T: Clone + 'static> DerivedSequence<S, T> {
    pub fn builder(projection: impl Fn(&S) -> T + 'static) -> DerivedSequenceBuilder<S, T> {
        DerivedSequenceBuilder::new(projection)
    }

    /// Binds to `source`, or unbinds if `None`.
    ///
    /// The current contents of a new source are replayed right away. Binding the same source
    /// again is a no-op. A source that can not be indexed and observed is rejected with
    /// [`BindError::InvalidSourceType`] and leaves everything as it was.
    pub fn set_source(
        &mut self,
        source: Option<Rc<dyn ObservableSequence<S>>>,
    ) -> Result<(), BindError> {
        let engine = Rc::downgrade(&self.engine);
        self.engine
            .borrow_mut()
            .bind(source, move || listener(engine))
    }

    pub fn bind(&mut self, source: Rc<dyn ObservableSequence<S>>) -> Result<(), BindError> {
        self.set_source(Some(source))
    }

    /// Detaches from the source and clears the derived contents.
    pub fn unbind(&mut self) {
        self.engine.borrow_mut().unbind();
    }

    pub fn source(&self) -> Option<Rc<dyn ObservableSequence<S>>> {
        self.status.source()
    }

    pub fn is_bound(&self) -> bool {
        self.source().is_some()
    }

    /// Rebuilds the derived contents from the current source.
    ///
    /// Use this when something the filter or comparator depends on has changed. The result is the
    /// same as binding the current source contents from scratch.
    pub fn refresh(&mut self) {
        debug!("Refresh");
        self.engine.borrow_mut().rebuild();
    }

    pub fn set_filter(&mut self, filter: impl Fn(&S) -> bool + 'static) {
        self.engine.borrow_mut().set_filter(Some(Rc::new(filter)));
    }

    pub fn clear_filter(&mut self) {
        self.engine.borrow_mut().set_filter(None);
    }

    /// Switches to sorted order under `comparator`.
    pub fn set_comparator(&mut self, comparator: impl Fn(&S, &S) -> cmp::Ordering + 'static) {
        self.engine
            .borrow_mut()
            .set_policy(OrderingPolicy::Sorted(Rc::new(comparator)));
    }

    /// Switches back to source order.
    pub fn clear_comparator(&mut self) {
        self.engine.borrow_mut().set_policy(OrderingPolicy::Mirror);
    }

    pub fn mode(&self) -> OrderingMode {
        self.status.mode()
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn view(&self) -> DerivedView<T> {
        self.view.clone()
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.view.get(index)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.view.to_vec()
    }
}

impl<S, T: Clone> Drop for DerivedSequence<S, T> {
    fn drop(&mut self) {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.unbind(),
            // Dropped from inside one of our own notifications. The engine can't be cleared
            // anymore, but the source must forget the listener.
            Err(_) => {
                self.status.detach();
            }
        }
    }
}

fn listener<S: Clone + 'static, T: Clone + 'static>(
    engine: Weak<RefCell<Engine<S, T>>>,
) -> Listener<S> {
    Rc::new(move |change: &SequenceChange<S>| {
        let Some(shared) = engine.upgrade() else {
            return;
        };
        let Ok(mut engine) = shared.try_borrow_mut() else {
            panic!(
                "Re-entrant {:?}: a source was mutated while one of its derived sequences was \
                 being updated",
                change.kind()
            );
        };
        engine.apply(change);
    })
}

pub struct DerivedSequenceBuilder<S, T> {
    projection: Projection<S, T>,
    filter: Option<Filter<S>>,
    comparator: Option<Comparator<S>>,
    settings: EngineSettings,
    source: Option<Rc<dyn ObservableSequence<S>>>,
}

impl<S: Clone + 'static, T: Clone + 'static> DerivedSequenceBuilder<S, T> {
    pub fn new(projection: impl Fn(&S) -> T + 'static) -> Self {
        Self {
            projection: Rc::new(projection),
            filter: None,
            comparator: None,
            settings: EngineSettings::default(),
            source: None,
        }
    }

    /// Only source items for which `filter` returns `true` are represented.
    pub fn filter(mut self, filter: impl Fn(&S) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    /// Sort ascending under `comparator` instead of following the source order.
    pub fn sort_by(mut self, comparator: impl Fn(&S, &S) -> cmp::Ordering + 'static) -> Self {
        self.comparator = Some(Rc::new(comparator));
        self
    }

    pub fn sort_by_key<K: Ord>(self, key: impl Fn(&S) -> K + 'static) -> Self {
        self.sort_by(move |a, b| key(a).cmp(&key(b)))
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(mut self, source: Rc<dyn ObservableSequence<S>>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<DerivedSequence<S, T>, BindError> {
        let engine = Engine::new(
            self.projection,
            self.filter,
            OrderingPolicy::from_comparator(self.comparator),
            self.settings,
        );
        let view = DerivedView::new(engine.output().clone());
        let mut derived = DerivedSequence {
            status: engine.status().clone(),
            settings: self.settings,
            engine: Rc::new(RefCell::new(engine)),
            view,
        };
        derived.set_source(self.source)?;
        Ok(derived)
    }
}

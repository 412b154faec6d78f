use std::{cmp, fmt, rc::Rc};

pub type Projection<S, T> = Rc<dyn Fn(&S) -> T>;
pub type Filter<S> = Rc<dyn Fn(&S) -> bool>;
pub type Comparator<S> = Rc<dyn Fn(&S, &S) -> cmp::Ordering>;

/// Where derived items are placed.
pub enum OrderingPolicy<S> {
    /// Derived order follows source order.
    Mirror,
    /// Derived order is ascending under the comparator. Equal items keep their arrival order.
    Sorted(Comparator<S>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OrderingMode {
    Mirror,
    Sorted,
}

impl<S> OrderingPolicy<S> {
    pub fn from_comparator(comparator: Option<Comparator<S>>) -> Self {
        match comparator {
            Some(comparator) => Self::Sorted(comparator),
            None => Self::Mirror,
        }
    }

    pub fn mode(&self) -> OrderingMode {
        match self {
            Self::Mirror => OrderingMode::Mirror,
            Self::Sorted(_) => OrderingMode::Sorted,
        }
    }
}

impl<S> Clone for OrderingPolicy<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Mirror => Self::Mirror,
            Self::Sorted(comparator) => Self::Sorted(comparator.clone()),
        }
    }
}

impl<S> fmt::Debug for OrderingPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.mode(), f)
    }
}

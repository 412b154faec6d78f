//! Derived sequences: a filtered, projected and optionally sorted sequence that is kept in sync
//! with an observable source sequence, change by change.
//!
//! ```
//! use std::rc::Rc;
//!
//! use tandem_derived::DerivedSequence;
//! use tandem_sequence::ObservableVec;
//!
//! let source = Rc::new(ObservableVec::from(vec![4, 1, 6, 3]));
//! let evens = DerivedSequence::builder(|v: &i32| *v)
//!     .filter(|v| v % 2 == 0)
//!     .source(source.clone())
//!     .build()
//!     .unwrap();
//! assert_eq!(evens.to_vec(), [4, 6]);
//!
//! source.push(8);
//! assert_eq!(evens.to_vec(), [4, 6, 8]);
//! ```
//!
//! Everything runs synchronously on the thread that mutates the source. Mutating the source from
//! inside a notification of one of its derived sequences is not allowed and panics.

mod derived_sequence;
mod emitter;
mod engine;
mod error;
mod ordering;
mod settings;
mod tracker;
mod view;

pub use derived_sequence::{DerivedSequence, DerivedSequenceBuilder};
pub use error::BindError;
pub use ordering::{Comparator, Filter, OrderingMode, OrderingPolicy, Projection};
pub use settings::{EngineSettings, InsertionSearch, NotificationBatching};
pub use view::DerivedView;

//! Observable, index-addressable sequences.
//!
//! A sequence reports every mutation to its listeners as a [`SequenceChange`], synchronously and
//! after its own contents already reflect the change. Listeners can therefore read the current
//! state of the sequence while handling a notification.
//!
//! Everything here is single threaded. Sequences are shared through `Rc` and use interior
//! mutability, so mutating a sequence from inside one of its own listeners fails fast on a borrow
//! conflict instead of observing half applied state.

mod change;
mod listeners;
mod observable;
mod observable_vec;
mod recorder;
mod snapshot;
mod writer;

pub use change::*;
pub use listeners::{Listener, ListenerId, ListenerRegistry};
pub use observable::*;
pub use observable_vec::ObservableVec;
pub use recorder::ChangeRecorder;
pub use snapshot::Snapshot;
pub use writer::*;

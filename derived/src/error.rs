use std::fmt;

use derive_more::{Display, Error};
use tandem_sequence::Capabilities;

#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The candidate source can not be indexed or observed. Nothing was changed.
    #[display("invalid source type, missing capabilities: {missing:?}")]
    InvalidSourceType { missing: Capabilities },
}

/// The tracked correspondence does not match what the source reports.
///
/// This is a bug in the engine or a source that reports changes its contents don't support.
/// Continuing would silently corrupt the derived order, so this panics.
pub(crate) fn invariant_violation(message: impl fmt::Display) -> ! {
    panic!("Internal error: correspondence inconsistency: {message}")
}

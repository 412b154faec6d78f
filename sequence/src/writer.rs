use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The sequence is maintained by someone else and rejects external writes.
    #[display("the sequence does not support external writes")]
    NotSupported,
    #[display("index {index} is out of bounds (length {len})")]
    OutOfBounds { index: usize, len: usize },
}

/// Checked write access to a sequence.
///
/// This is the surface generic consumers (for example list controls that support editing) write
/// through. Sequences that are derived from others implement it by rejecting every write with
/// [`WriteError::NotSupported`].
pub trait SequenceWriter<T> {
    fn try_insert(&self, index: usize, item: T) -> Result<(), WriteError>;
    fn try_remove(&self, index: usize) -> Result<T, WriteError>;
    fn try_replace(&self, index: usize, item: T) -> Result<T, WriteError>;
    fn try_clear(&self) -> Result<(), WriteError>;
}

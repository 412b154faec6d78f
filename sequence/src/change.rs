use std::ops::Range;

/// One atomic mutation of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceChange<T> {
    /// `items` were inserted, the first one now lives at `index`.
    Insert { index: usize, items: Vec<T> },
    /// `items` were removed, the first one lived at `index`.
    Remove { index: usize, items: Vec<T> },
    /// The item at `index` was overwritten.
    Replace { index: usize, old: T, new: T },
    /// The contents changed wholesale. Listeners re-read the sequence.
    Reset,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Remove,
    Replace,
    Reset,
}

impl<T> SequenceChange<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert { .. } => ChangeKind::Insert,
            Self::Remove { .. } => ChangeKind::Remove,
            Self::Replace { .. } => ChangeKind::Replace,
            Self::Reset => ChangeKind::Reset,
        }
    }

    /// The index range the change covers, in the coordinates of the sequence _before_ the change
    /// for removals and _after_ the change for insertions.
    ///
    /// `None` for [`SequenceChange::Reset`].
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            Self::Insert { index, items } | Self::Remove { index, items } => {
                Some(*index..*index + items.len())
            }
            Self::Replace { index, .. } => Some(*index..*index + 1),
            Self::Reset => None,
        }
    }

    pub fn map<R>(self, mut f: impl FnMut(T) -> R) -> SequenceChange<R> {
        match self {
            Self::Insert { index, items } => SequenceChange::Insert {
                index,
                items: items.into_iter().map(f).collect(),
            },
            Self::Remove { index, items } => SequenceChange::Remove {
                index,
                items: items.into_iter().map(f).collect(),
            },
            Self::Replace { index, old, new } => SequenceChange::Replace {
                index,
                old: f(old),
                new: f(new),
            },
            Self::Reset => SequenceChange::Reset,
        }
    }

    /// Applies the change to a plain vector that mirrors the sequence.
    ///
    /// A `Reset` can not be replayed from the notification alone, `reread` is called to produce
    /// the new contents.
    pub fn apply_to_vec(&self, vec: &mut Vec<T>, reread: impl FnOnce() -> Vec<T>)
    where
        T: Clone,
    {
        match self {
            Self::Insert { index, items } => {
                vec.splice(*index..*index, items.iter().cloned());
            }
            Self::Remove { index, items } => {
                vec.drain(*index..*index + items.len());
            }
            Self::Replace { index, new, .. } => {
                vec[*index] = new.clone();
            }
            Self::Reset => *vec = reread(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        let insert = SequenceChange::Insert {
            index: 2,
            items: vec!['a', 'b'],
        };
        assert_eq!(insert.range(), Some(2..4));

        let replace = SequenceChange::Replace {
            index: 1,
            old: 'a',
            new: 'b',
        };
        assert_eq!(replace.range(), Some(1..2));
        assert_eq!(SequenceChange::<char>::Reset.range(), None);
    }

    #[test]
    fn apply_changes_to_vec() {
        let mut vec = vec![1, 2, 3];

        SequenceChange::Insert {
            index: 1,
            items: vec![7, 8],
        }
        .apply_to_vec(&mut vec, Vec::new);
        assert_eq!(vec, [1, 7, 8, 2, 3]);

        SequenceChange::Remove {
            index: 0,
            items: vec![1, 7],
        }
        .apply_to_vec(&mut vec, Vec::new);
        assert_eq!(vec, [8, 2, 3]);

        SequenceChange::Replace {
            index: 2,
            old: 3,
            new: 9,
        }
        .apply_to_vec(&mut vec, Vec::new);
        assert_eq!(vec, [8, 2, 9]);

        SequenceChange::Reset.apply_to_vec(&mut vec, || vec![4]);
        assert_eq!(vec, [4]);
    }

    #[test]
    fn map_keeps_shape() {
        let change = SequenceChange::Remove {
            index: 3,
            items: vec![1, 2],
        }
        .map(|v| v * 10);

        assert_eq!(
            change,
            SequenceChange::Remove {
                index: 3,
                items: vec![10, 20]
            }
        );
        assert_eq!(change.kind(), ChangeKind::Remove);
    }
}

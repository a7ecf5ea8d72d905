use std::fmt::{self, Debug, Formatter};

use derive_more::IsVariant;

use crate::collections::linked::Entry;

/// An enum to represent the position of a [`Cursor`](super::Cursor).
#[derive(IsVariant)]
pub enum Position<T> {
    /// The cursor is parked at the 'ghost' position before the first entry.
    AtTop,
    /// The cursor is parked at the 'ghost' position after the last entry.
    AtBottom,
    /// The cursor is bound to an entry within the list.
    OnEntry(Entry<T>),
}

impl<T> Position<T> {
    /// Returns the bound entry, or [`None`] for a parked cursor.
    pub fn entry(&self) -> Option<&Entry<T>> {
        match self {
            Position::OnEntry(entry) => Some(entry),
            Position::AtTop | Position::AtBottom => None,
        }
    }
}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Position::AtTop, Position::AtTop) | (Position::AtBottom, Position::AtBottom) => true,
            (Position::OnEntry(a), Position::OnEntry(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> Eq for Position<T> {}

impl<T: Debug> Debug for Position<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Position::AtTop => write!(f, "AtTop"),
            Position::AtBottom => write!(f, "AtBottom"),
            Position::OnEntry(entry) => f.debug_tuple("OnEntry").field(entry.value()).finish(),
        }
    }
}

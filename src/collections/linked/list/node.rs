use std::fmt::{self, Debug, Formatter};

use derive_more::IsVariant;

use crate::collections::arena::Key;
use crate::collections::linked::Entry;

pub(crate) type EntryKey<T> = Key<Node<T>>;
pub(crate) type CursorKey<T> = Key<CursorNode<T>>;

/// The list's view of an [`Entry`]: its neighbours and the head of the chain of cursors bound to
/// it.
pub(crate) struct Node<T> {
    pub entry: Entry<T>,
    pub prev: Option<EntryKey<T>>,
    pub next: Option<EntryKey<T>>,
    pub cursors: Option<CursorKey<T>>,
}

/// The list's view of a [`Cursor`](crate::collections::linked::Cursor). `pos` says which chain
/// the cursor is threaded into, `prev` and `next` are its neighbours within that chain.
pub(crate) struct CursorNode<T> {
    pub pos: CursorPosition<T>,
    pub prev: Option<CursorKey<T>>,
    pub next: Option<CursorKey<T>>,
}

#[derive(IsVariant)]
pub(crate) enum CursorPosition<T> {
    /// Parked before the first entry.
    AtTop,
    /// Parked after the last entry.
    AtBottom,
    /// Bound to an entry.
    OnEntry(EntryKey<T>),
}

pub(crate) use CursorPosition::*;

impl<T> Clone for CursorPosition<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CursorPosition<T> {}

impl<T> PartialEq for CursorPosition<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AtTop, AtTop) | (AtBottom, AtBottom) => true,
            (OnEntry(a), OnEntry(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> Eq for CursorPosition<T> {}

impl<T> Debug for CursorPosition<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AtTop => write!(f, "AtTop"),
            AtBottom => write!(f, "AtBottom"),
            OnEntry(key) => f.debug_tuple("OnEntry").field(key).finish(),
        }
    }
}

//! A concurrent, cursor-aware doubly-linked list. Primarily revolves around [`LinkedList`], the
//! shared [`Entry`] handles it holds, and the accompanying [`Cursor`] type.
//!
//! # Locking
//! There are three kinds of lock, always acquired in the same order:
//! 1. A [`Cursor`]'s own lock, so only one thread moves a cursor at a time.
//! 2. A [`LinkedList`]'s lock, guarding its entry chain and every cursor position. When two lists
//!    are locked together, the one created first is locked first.
//! 3. An [`Entry`]'s link, recording which list holds it. This is held only briefly, and never
//!    while acquiring anything else.
//!
//! Removing an entry moves any cursors on it without taking their locks: a cursor's position
//! lives with the list, and the cursor's own lock only serializes the threads driving it.

pub mod cursor;
pub mod entry;
pub mod list;

#[doc(inline)]
pub use cursor::{Cursor, Position};
#[doc(inline)]
pub use entry::Entry;
pub(crate) use entry::Link;
#[doc(inline)]
pub use list::{Iter, LinkedList};
#[doc(inline)]
pub use crate::util::error::{
    AlreadyInList, CrossListMove, DetachedEntry, InsertError, MoveError, NotInList, PoisonedLock,
};

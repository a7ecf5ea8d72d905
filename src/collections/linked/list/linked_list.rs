use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use super::{AtBottom, AtTop, CursorPosition, Iter, ListState};
use crate::collections::linked::{Cursor, Entry};
#[doc(inline)]
pub use crate::util::error::{AlreadyInList, InsertError, NotInList};
use crate::util::id::ListId;
use crate::util::result::ResultExtension;
use crate::util::sync::MutexExtension;

/// A doubly-linked list of shared [`Entry`]s that any number of threads can walk and modify at
/// once. See also: [`Cursor`] for traversal that survives concurrent removal.
///
/// A `LinkedList` is a handle: cloning it gives another handle to the same list, and the list
/// lives as long as any handle, [`Cursor`] or [`Iter`] over it does. When the last of those is
/// dropped, every entry still in the list is detached and can be inserted elsewhere.
///
/// Every fallible method comes in two forms: `try_x` returns the error, while `x` panics with its
/// message. The errors all describe misuse rather than transient conditions.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the list.
/// - `k`: The number of cursors bound to the entry in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `first/last` | `O(1)` |
/// | `insert_at_top/bottom` | `O(1)` |
/// | `insert_after/before` | `O(1)` |
/// | `remove` | `O(k)` |
/// | `contains` | `O(1)` |
/// | `new_cursor` | `O(1)` |
/// | `transfer` | `O(n)` of the other list |
///
/// # Locking
/// Each list has its own lock, held for the full duration of every method. Cursors take their own
/// lock before the list's. [`transfer`](LinkedList::transfer) locks both lists in order of their
/// creation, so reciprocal transfers can't deadlock.
pub struct LinkedList<T> {
    pub(crate) shared: Arc<ListShared<T>>,
}

pub(crate) struct ListShared<T> {
    pub id: ListId,
    pub state: Mutex<ListState<T>>,
}

impl<T> LinkedList<T> {
    /// Creates a new LinkedList with no entries.
    pub fn new() -> LinkedList<T> {
        let id = ListId::fresh();
        LinkedList {
            shared: Arc::new_cyclic(|owner| ListShared {
                id,
                state: Mutex::new(ListState::new(id, owner.clone())),
            }),
        }
    }

    /// Returns the number of entries in the list.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the list contains no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the first entry in the list, if it exists.
    pub fn first(&self) -> Option<Entry<T>> {
        let state = self.lock();
        state.first.map(|key| state.entry(key))
    }

    /// Returns the last entry in the list, if it exists.
    pub fn last(&self) -> Option<Entry<T>> {
        let state = self.lock();
        state.last.map(|key| state.entry(key))
    }

    /// Returns true if `entry` is currently a member of this list.
    pub fn contains(&self, entry: &Entry<T>) -> bool {
        self.lock().key_of(entry).is_some()
    }

    /// Adds a detached entry to the end of the list, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `entry` is already in a list.
    #[track_caller]
    pub fn insert_at_bottom(&self, entry: &Entry<T>) {
        self.try_insert_at_bottom(entry).throw()
    }

    /// Adds a detached entry to the end of the list, returning an [`Err`] if it is already in a
    /// list.
    pub fn try_insert_at_bottom(&self, entry: &Entry<T>) -> Result<(), AlreadyInList> {
        self.lock().force_insert_at_bottom(entry)?;
        Ok(())
    }

    /// Adds a detached entry to the start of the list, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `entry` is already in a list.
    #[track_caller]
    pub fn insert_at_top(&self, entry: &Entry<T>) {
        self.try_insert_at_top(entry).throw()
    }

    /// Adds a detached entry to the start of the list, returning an [`Err`] if it is already in a
    /// list.
    pub fn try_insert_at_top(&self, entry: &Entry<T>) -> Result<(), AlreadyInList> {
        self.lock().force_insert_at_top(entry)?;
        Ok(())
    }

    /// Enqueues an entry: the same as [`insert_at_bottom`](LinkedList::insert_at_bottom).
    ///
    /// # Panics
    /// Panics if `entry` is already in a list.
    #[track_caller]
    pub fn put(&self, entry: &Entry<T>) {
        self.insert_at_bottom(entry)
    }

    /// The same as [`try_insert_at_bottom`](LinkedList::try_insert_at_bottom).
    pub fn try_put(&self, entry: &Entry<T>) -> Result<(), AlreadyInList> {
        self.try_insert_at_bottom(entry)
    }

    /// Inserts `new` directly after `after`, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `new` is already in a list or `after` isn't in this one.
    #[track_caller]
    pub fn insert_after(&self, new: &Entry<T>, after: &Entry<T>) {
        self.try_insert_after(new, after).throw()
    }

    pub fn try_insert_after(&self, new: &Entry<T>, after: &Entry<T>) -> Result<(), InsertError> {
        let mut state = self.lock();
        let after = state.key_of(after).ok_or(NotInList)?;
        state.force_insert_after(new, after)?;
        Ok(())
    }

    /// Inserts `new` directly before `before`, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `new` is already in a list or `before` isn't in this one.
    #[track_caller]
    pub fn insert_before(&self, new: &Entry<T>, before: &Entry<T>) {
        self.try_insert_before(new, before).throw()
    }

    pub fn try_insert_before(&self, new: &Entry<T>, before: &Entry<T>) -> Result<(), InsertError> {
        let mut state = self.lock();
        let before = state.key_of(before).ok_or(NotInList)?;
        state.force_insert_before(new, before)?;
        Ok(())
    }

    /// Removes `entry` from the list and returns it, panicking on a failure. Any cursors on the
    /// entry are moved back to the entry before it, or to the top of the list.
    ///
    /// # Panics
    /// Panics if `entry` isn't in this list.
    #[track_caller]
    pub fn remove(&self, entry: &Entry<T>) -> Entry<T> {
        self.try_remove(entry).throw()
    }

    /// Removes `entry` from the list and returns it, returning an [`Err`] if it isn't in this list
    /// rather than panicking.
    pub fn try_remove(&self, entry: &Entry<T>) -> Result<Entry<T>, NotInList> {
        self.lock().force_remove(entry)
    }

    /// Dequeues the first entry of the list, if there is one.
    pub fn remove_first(&self) -> Option<Entry<T>> {
        let mut state = self.lock();
        let first = state.first?;
        Some(state.remove_key(first))
    }

    /// Creates a cursor parked before the first entry.
    pub fn new_cursor(&self, name: Option<&str>) -> Cursor<T> {
        self.cursor_at(name, AtTop)
    }

    /// Creates a cursor parked after the last entry.
    pub fn new_cursor_at_bottom(&self, name: Option<&str>) -> Cursor<T> {
        self.cursor_at(name, AtBottom)
    }

    /// Moves every entry from `other` onto the end of this list, preserving their order and
    /// leaving `other` empty. Returns the number of entries moved.
    ///
    /// Cursors on `other` that were bound to a moved entry end up parked at the top of `other`,
    /// exactly as if each entry had been removed from its front in turn. Both lists stay locked
    /// throughout, so no thread sees a partial transfer. Transferring a list into itself does
    /// nothing.
    pub fn transfer(&self, other: &LinkedList<T>) -> usize {
        if self == other {
            return 0;
        }

        let (mut target, mut source) = if self.shared.id < other.shared.id {
            let target = self.lock();
            (target, other.lock())
        } else {
            let source = other.lock();
            (self.lock(), source)
        };

        let moved = target.absorb(&mut source);
        debug!("{}: transferred {moved} entries from {}", self.shared.id, other.shared.id);
        moved
    }

    /// Returns a live iterator over the entries of the list, backed by its own [`Cursor`].
    ///
    /// The iterator holds no lock between items, so entries inserted or removed while iterating
    /// are observed the same way a cursor observes them.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.new_cursor(Some("iter")))
    }
}

impl<T> LinkedList<T> {
    pub(crate) fn lock(&self) -> MutexGuard<'_, ListState<T>> {
        self.shared.state.acquire()
    }

    fn cursor_at(&self, name: Option<&str>, pos: CursorPosition<T>) -> Cursor<T> {
        let key = self.lock().new_cursor(pos);
        trace!("{}: created cursor {key:?} ({name:?}) at {pos:?}", self.shared.id);
        Cursor::new(name.map(str::to_owned), self.clone(), key)
    }

    #[cfg(test)]
    pub(crate) fn verify_links(&self) {
        self.lock().verify_links()
    }
}

impl<T> Drop for ListShared<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        let id = state.id;
        for node in state.entries.drain() {
            let mut link = node.entry.core.link.lock().unwrap_or_else(PoisonError::into_inner);
            if link.as_ref().is_some_and(|link| link.id == id) {
                *link = None;
            }
        }
    }
}

impl<T> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        LinkedList {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shared.id == other.shared.id
    }
}

impl<T> Eq for LinkedList<T> {}

impl<T> Hash for LinkedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shared.id.hash(state);
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut state = self.lock();
        for value in iter {
            state.force_insert_at_bottom(&Entry::new(value)).throw();
        }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = Entry<T>;

    type IntoIter = Iter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let entries = self.lock().entries();
        f.debug_struct("LinkedList")
            .field("id", &self.shared.id)
            .field("contents", &entries.iter().map(Entry::value).collect::<Vec<_>>())
            .field("len", &entries.len())
            .finish()
    }
}

impl<T: Debug> Display for LinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let entries = self.lock().entries();
        write!(
            f,
            "({})",
            entries
                .iter()
                .map(|entry| format!("{:?}", entry.value()))
                .collect::<Vec<String>>()
                .join(") -> (")
        )
    }
}

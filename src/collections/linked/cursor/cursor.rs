use std::fmt::{self, Debug, Formatter};
use std::ptr;
use std::sync::{Mutex, PoisonError};

use log::{trace, warn};

use super::Position;
use crate::collections::linked::list::{AtBottom, AtTop, CursorKey, ListState, OnEntry};
use crate::collections::linked::{Entry, LinkedList};
#[doc(inline)]
pub use crate::util::error::{CrossListMove, DetachedEntry, MoveError};
use crate::util::result::ResultExtension;
use crate::util::sync::MutexExtension;

/// A type for bi-directional traversal of a [`LinkedList`] that keeps its place while the list is
/// modified. See [`LinkedList::new_cursor`] and [`LinkedList::new_cursor_at_bottom`] to create
/// one.
///
/// A cursor is always in exactly one of three positions: parked at the top (before the first
/// entry), parked at the bottom (after the last entry), or on an entry. When the entry a cursor is
/// on gets removed, the cursor moves back to the entry before it, or to the top if there isn't
/// one, so it never refers to an entry that has left the list.
///
/// Cursors never borrow from their list and can be shared between threads. Each one has its own
/// lock, always taken before the list's, so two threads can't move the same cursor at once.
///
/// Once [`finish`](Cursor::finish)ed, a cursor is detached for good and every method fails with
/// [`DetachedEntry`]. Dropping a cursor finishes it.
pub struct Cursor<T> {
    name: Option<String>,
    list: LinkedList<T>,
    key: Mutex<Option<CursorKey<T>>>,
}

impl<T> Cursor<T> {
    pub(crate) const fn new(
        name: Option<String>,
        list: LinkedList<T>,
        key: CursorKey<T>,
    ) -> Cursor<T> {
        Cursor {
            name,
            list,
            key: Mutex::new(Some(key)),
        }
    }

    /// Returns the name the cursor was created with. It is only used for diagnostics.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns a handle to the list the cursor traverses.
    pub fn list(&self) -> &LinkedList<T> {
        &self.list
    }

    /// Returns true until the cursor is finished.
    pub fn is_attached(&self) -> bool {
        self.key.acquire().is_some()
    }

    /// Moves one step towards the bottom of the list and returns the entry moved onto, panicking
    /// if the cursor is finished.
    ///
    /// From the top, this moves onto the first entry (or stays put if the list is empty). From the
    /// last entry, it parks at the bottom and returns [`None`]. At the bottom it does nothing.
    ///
    /// # Panics
    /// Panics if the cursor is finished, or if the list's links have been corrupted.
    #[track_caller]
    pub fn next(&self) -> Option<Entry<T>> {
        self.try_next().throw()
    }

    pub fn try_next(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_state(|state, key| {
            let pos = state.after(state.cursor_node(key).pos);
            state.move_cursor(key, pos);
            state.entry_at(pos)
        })
    }

    /// Moves one step towards the top of the list and returns the entry moved onto, panicking if
    /// the cursor is finished. The mirror image of [`next`](Cursor::next).
    ///
    /// # Panics
    /// Panics if the cursor is finished, or if the list's links have been corrupted.
    #[track_caller]
    pub fn previous(&self) -> Option<Entry<T>> {
        self.try_previous().throw()
    }

    pub fn try_previous(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_state(|state, key| {
            let pos = state.before(state.cursor_node(key).pos);
            state.move_cursor(key, pos);
            state.entry_at(pos)
        })
    }

    /// Returns the entry the cursor is on, or [`None`] if it is parked.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn current(&self) -> Option<Entry<T>> {
        self.try_current().throw()
    }

    pub fn try_current(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_state(|state, key| state.entry_at(state.cursor_node(key).pos))
    }

    /// Returns the cursor's full position.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn position(&self) -> Position<T> {
        self.try_position().throw()
    }

    pub fn try_position(&self) -> Result<Position<T>, DetachedEntry> {
        self.with_state(|state, key| match state.cursor_node(key).pos {
            AtTop => Position::AtTop,
            AtBottom => Position::AtBottom,
            OnEntry(entry) => Position::OnEntry(state.entry(entry)),
        })
    }

    /// Returns the entry that [`next`](Cursor::next) would move onto, without moving.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn next_entry(&self) -> Option<Entry<T>> {
        self.try_next_entry().throw()
    }

    pub fn try_next_entry(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_state(|state, key| state.entry_at(state.after(state.cursor_node(key).pos)))
    }

    /// Returns the entry that [`previous`](Cursor::previous) would move onto, without moving.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn previous_entry(&self) -> Option<Entry<T>> {
        self.try_previous_entry().throw()
    }

    pub fn try_previous_entry(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_state(|state, key| state.entry_at(state.before(state.cursor_node(key).pos)))
    }

    /// Parks the cursor before the first entry.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn move_to_top(&self) {
        self.try_move_to_top().throw()
    }

    pub fn try_move_to_top(&self) -> Result<(), DetachedEntry> {
        self.with_state(|state, key| state.move_cursor(key, AtTop))
    }

    /// Parks the cursor after the last entry.
    ///
    /// # Panics
    /// Panics if the cursor is finished.
    #[track_caller]
    pub fn move_to_bottom(&self) {
        self.try_move_to_bottom().throw()
    }

    pub fn try_move_to_bottom(&self) -> Result<(), DetachedEntry> {
        self.with_state(|state, key| state.move_cursor(key, AtBottom))
    }

    /// Binds the cursor to `entry`, panicking on a failure.
    ///
    /// # Panics
    /// Panics if the cursor is finished, or if `entry` is detached or in a different list.
    #[track_caller]
    pub fn move_to_entry(&self, entry: &Entry<T>) {
        self.try_move_to_entry(entry).throw()
    }

    pub fn try_move_to_entry(&self, entry: &Entry<T>) -> Result<(), MoveError> {
        self.with_state(|state, key| {
            let target = state.key_of(entry).ok_or_else(|| {
                if entry.is_attached() {
                    MoveError::from(CrossListMove)
                } else {
                    MoveError::from(DetachedEntry)
                }
            })?;
            state.move_cursor(key, OnEntry(target));
            Ok(())
        })?
    }

    /// Moves the cursor to wherever `other` is, whether that's parked at an end or on an entry.
    ///
    /// # Panics
    /// Panics if either cursor is finished, or if `other` traverses a different list.
    #[track_caller]
    pub fn move_to_cursor(&self, other: &Cursor<T>) {
        self.try_move_to_cursor(other).throw()
    }

    pub fn try_move_to_cursor(&self, other: &Cursor<T>) -> Result<(), MoveError> {
        if !self.is_attached() {
            return Err(DetachedEntry.into());
        }
        if self.list != other.list {
            return Err(CrossListMove.into());
        }
        if ptr::eq(self, other) {
            return Ok(self.with_state(|_, _| ())?);
        }

        // Read without holding our own lock, so two cursors moving to each other can't deadlock.
        // If `other` finishes before the list is locked, its key goes stale and the lookup below
        // fails.
        let other_key = (*other.key.acquire()).ok_or(DetachedEntry)?;
        self.with_state(|state, key| {
            let pos = state.cursor_position(other_key).ok_or(DetachedEntry)?;
            state.move_cursor(key, pos);
            Ok(())
        })?
    }

    /// Detaches the cursor from its list for good, panicking if it was already finished.
    ///
    /// # Panics
    /// Panics if the cursor is already finished.
    #[track_caller]
    pub fn finish(&self) {
        self.try_finish().throw()
    }

    pub fn try_finish(&self) -> Result<(), DetachedEntry> {
        let mut guard = self.key.acquire();
        let key = guard.take().ok_or(DetachedEntry)?;
        self.list.lock().drop_cursor(key);
        trace!("{}: finished cursor {key:?} ({:?})", self.list.shared.id, self.name);
        Ok(())
    }

    /// Runs `op` with the cursor's lock and then the list's lock held.
    fn with_state<R>(
        &self,
        op: impl FnOnce(&mut ListState<T>, CursorKey<T>) -> R,
    ) -> Result<R, DetachedEntry> {
        let guard = self.key.acquire();
        let key = (*guard).ok_or(DetachedEntry)?;
        let mut state = self.list.lock();
        Ok(op(&mut state, key))
    }
}

impl<T> Drop for Cursor<T> {
    fn drop(&mut self) {
        let key = self.key.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(key) = key {
            match self.list.shared.state.try_acquire() {
                Ok(mut state) => state.drop_cursor(key),
                Err(error) => warn!("{}: dropping cursor {key:?}: {error}", self.list.shared.id),
            }
        }
    }
}

impl<T: Debug> Debug for Cursor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("name", &self.name)
            .field("list", &self.list.shared.id)
            .field("position", &self.try_position().ok())
            .finish()
    }
}

use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, Weak};

use crate::collections::linked::list::{EntryKey, ListShared, ListState};
use crate::collections::linked::LinkedList;
#[doc(inline)]
pub use crate::util::error::{DetachedEntry, InsertError};
use crate::util::id::ListId;
use crate::util::result::ResultExtension;
use crate::util::sync::MutexExtension;

/// A shared handle to a payload that can be a member of at most one [`LinkedList`] at a time.
///
/// Entries are created detached and become attached when a list inserts them. Cloning an entry
/// clones the handle, not the payload, and two handles compare equal only if they are the same
/// entry.
///
/// The methods here that navigate or modify a list find the owning list through the entry itself,
/// so they work from any thread holding a handle. They fail with [`DetachedEntry`] if the entry
/// isn't in a list.
pub struct Entry<T> {
    pub(crate) core: Arc<EntryCore<T>>,
}

pub(crate) struct EntryCore<T> {
    value: T,
    /// Which list holds the entry and where. Only changed with the owning list's lock held, and
    /// always locked after it.
    pub link: Mutex<Option<Link<T>>>,
}

pub(crate) struct Link<T> {
    pub id: ListId,
    pub list: Weak<ListShared<T>>,
    pub key: EntryKey<T>,
}

impl<T> Entry<T> {
    /// Creates a new detached entry holding `value`.
    pub fn new(value: T) -> Entry<T> {
        Entry {
            core: Arc::new(EntryCore {
                value,
                link: Mutex::new(None),
            }),
        }
    }

    /// Returns a reference to the entry's payload.
    pub fn value(&self) -> &T {
        &self.core.value
    }

    /// Returns true if the entry is currently in a list.
    pub fn is_attached(&self) -> bool {
        self.core.link.acquire().is_some()
    }

    /// Returns a handle to the list holding this entry, if there is one.
    pub fn list(&self) -> Option<LinkedList<T>> {
        self.core
            .link
            .acquire()
            .as_ref()
            .and_then(|link| link.list.upgrade())
            .map(|shared| LinkedList { shared })
    }

    /// Returns the entry before this one, or [`None`] if this is the first entry.
    ///
    /// # Panics
    /// Panics if the entry is detached.
    #[track_caller]
    pub fn previous(&self) -> Option<Entry<T>> {
        self.try_previous().throw()
    }

    pub fn try_previous(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_list(|state, key| state.node(key).prev.map(|prev| state.entry(prev)))
    }

    /// Returns the entry after this one, or [`None`] if this is the last entry.
    ///
    /// # Panics
    /// Panics if the entry is detached.
    #[track_caller]
    pub fn next(&self) -> Option<Entry<T>> {
        self.try_next().throw()
    }

    pub fn try_next(&self) -> Result<Option<Entry<T>>, DetachedEntry> {
        self.with_list(|state, key| state.node(key).next.map(|next| state.entry(next)))
    }

    /// Inserts `new` directly after this entry, in whichever list holds it.
    ///
    /// # Panics
    /// Panics if this entry is detached or `new` is already in a list.
    #[track_caller]
    pub fn insert_after(&self, new: &Entry<T>) {
        self.try_insert_after(new).throw()
    }

    pub fn try_insert_after(&self, new: &Entry<T>) -> Result<(), InsertError> {
        self.with_list(|state, key| state.force_insert_after(new, key))??;
        Ok(())
    }

    /// Removes this entry from whichever list holds it, moving any cursors on it back a step.
    ///
    /// # Panics
    /// Panics if the entry is detached.
    #[track_caller]
    pub fn remove(&self) {
        self.try_remove().throw()
    }

    pub fn try_remove(&self) -> Result<(), DetachedEntry> {
        self.with_list(|state, key| {
            state.remove_key(key);
        })
    }

    /// Runs `op` with the owning list locked.
    ///
    /// The link can't be read with the list lock held without first knowing the list, so it is
    /// read, the list locked, then the link checked again. If a transfer moved the entry in the
    /// meantime, this follows it to the new list.
    fn with_list<R>(
        &self,
        op: impl FnOnce(&mut ListState<T>, EntryKey<T>) -> R,
    ) -> Result<R, DetachedEntry> {
        loop {
            let list = self.list().ok_or(DetachedEntry)?;
            let mut state = list.lock();
            if let Some(key) = state.key_of(self) {
                return Ok(op(&mut state, key));
            }
        }
    }
}

impl<T> Link<T> {
    pub(crate) const fn new(id: ListId, list: Weak<ListShared<T>>, key: EntryKey<T>) -> Link<T> {
        Link { id, list, key }
    }
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Entry {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Hash for Entry<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.core).hash(state);
    }
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("value", &self.core.value)
            .field("attached", &self.is_attached())
            .finish()
    }
}

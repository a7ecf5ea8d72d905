use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use crate::collections::arena::{Arena, Key};
#[doc(inline)]
pub use crate::util::error::NotInList;
use crate::util::id::ListId;
use crate::util::option::OptionExtension;
use crate::util::result::ResultExtension;

/// A minimal doubly-linked list supporting only appending, removal of a known entry and peeking
/// at the front. It has no cursors and no internal locking: mutation takes `&mut self`, so callers
/// sharing one between threads serialize access themselves.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `put` | `O(1)` (amortized) |
/// | `first` | `O(1)` |
/// | `get` | `O(1)` |
/// | `remove` | `O(1)` |
pub struct SimpleLinkedList<T> {
    id: ListId,
    nodes: Arena<SimpleNode<T>>,
    first: Option<SimpleKey<T>>,
    last: Option<SimpleKey<T>>,
}

struct SimpleNode<T> {
    value: T,
    prev: Option<SimpleKey<T>>,
    next: Option<SimpleKey<T>>,
}

type SimpleKey<T> = Key<SimpleNode<T>>;

/// A handle to a value appended to a [`SimpleLinkedList`]. It stays valid until the value is
/// removed, after which every use of it fails.
pub struct SimpleEntry<T> {
    list: ListId,
    key: SimpleKey<T>,
}

impl<T> SimpleLinkedList<T> {
    /// Creates a new SimpleLinkedList with no elements.
    pub fn new() -> SimpleLinkedList<T> {
        SimpleLinkedList {
            id: ListId::fresh(),
            nodes: Arena::new(),
            first: None,
            last: None,
        }
    }

    /// Returns the length of the SimpleLinkedList.
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the SimpleLinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Appends `value` to the end of the list, returning a handle for removing it later.
    pub fn put(&mut self, value: T) -> SimpleEntry<T> {
        let key = self.nodes.insert(SimpleNode {
            value,
            prev: self.last,
            next: None,
        });

        match self.last {
            Some(last) => self.node_mut(last).next = Some(key),
            None => self.first = Some(key),
        }
        self.last = Some(key);

        SimpleEntry { list: self.id, key }
    }

    /// Returns a handle to the first entry in the list, if it exists.
    pub fn first(&self) -> Option<SimpleEntry<T>> {
        self.first.map(|key| SimpleEntry { list: self.id, key })
    }

    /// Returns a reference to the value of `entry`, or [`None`] if it isn't in this list.
    pub fn get(&self, entry: SimpleEntry<T>) -> Option<&T> {
        if entry.list != self.id {
            return None;
        }
        self.nodes.get(entry.key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value of `entry`, or [`None`] if it isn't in this list.
    pub fn get_mut(&mut self, entry: SimpleEntry<T>) -> Option<&mut T> {
        if entry.list != self.id {
            return None;
        }
        self.nodes.get_mut(entry.key).map(|node| &mut node.value)
    }

    /// Returns true if `entry` is still in this list.
    pub fn contains(&self, entry: SimpleEntry<T>) -> bool {
        self.get(entry).is_some()
    }

    /// Removes and returns the first value in the list, if the list isn't empty.
    pub fn pop_first(&mut self) -> Option<T> {
        let key = self.first?;
        Some(self.unlink(key))
    }

    /// Returns an iterator over the values in the list, front to back.
    pub fn iter(&self) -> SimpleIter<'_, T> {
        SimpleIter {
            list: self,
            curr: self.first,
        }
    }

    fn unlink(&mut self, key: SimpleKey<T>) -> T {
        let node = self.nodes.remove(key).consistent("simple list node");

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.first = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.last = node.prev,
        }

        node.value
    }

    fn node_mut(&mut self, key: SimpleKey<T>) -> &mut SimpleNode<T> {
        self.nodes.get_mut(key).consistent("simple list neighbour")
    }
}

impl<T> SimpleEntry<T> {
    /// Removes this entry from `list` and returns its value, panicking on a failure.
    ///
    /// # Panics
    /// Panics if the entry was already removed or belongs to a different list.
    #[track_caller]
    pub fn remove(self, list: &mut SimpleLinkedList<T>) -> T {
        self.try_remove(list).throw()
    }

    /// Removes this entry from `list` and returns its value, returning an [`Err`] if it was
    /// already removed or belongs to a different list.
    pub fn try_remove(self, list: &mut SimpleLinkedList<T>) -> Result<T, NotInList> {
        if self.list != list.id || !list.nodes.contains(self.key) {
            return Err(NotInList);
        }
        Ok(list.unlink(self.key))
    }
}

/// An iterator over the values of a [`SimpleLinkedList`].
pub struct SimpleIter<'a, T> {
    list: &'a SimpleLinkedList<T>,
    curr: Option<SimpleKey<T>>,
}

impl<'a, T> Iterator for SimpleIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.curr?).consistent("simple list node");
        self.curr = node.next;
        Some(&node.value)
    }
}

impl<T> Default for SimpleLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SimpleLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SimpleLinkedList::new();
        for item in iter {
            list.put(item);
        }
        list
    }
}

impl<T: Debug> Debug for SimpleLinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Clone for SimpleEntry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SimpleEntry<T> {}

impl<T> PartialEq for SimpleEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list && self.key == other.key
    }
}

impl<T> Eq for SimpleEntry<T> {}

impl<T> Hash for SimpleEntry<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.list.hash(state);
        self.key.hash(state);
    }
}

impl<T> Debug for SimpleEntry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleEntry")
            .field("list", &self.list)
            .field("key", &self.key)
            .finish()
    }
}

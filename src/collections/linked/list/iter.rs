use std::iter::FusedIterator;

use crate::collections::linked::{Cursor, Entry};

/// A live iterator over a [`LinkedList`](super::LinkedList), created by
/// [`LinkedList::iter`](super::LinkedList::iter).
///
/// Each step moves a private [`Cursor`], so removing the entry the iterator last returned doesn't
/// disturb it. Once it has returned [`None`] it is exhausted for good, even if entries are
/// inserted afterwards, including into a list that was empty when iteration started.
pub struct Iter<T> {
    pub(crate) cursor: Cursor<T>,
    done: bool,
}

impl<T> Iter<T> {
    pub(crate) const fn new(cursor: Cursor<T>) -> Iter<T> {
        Iter {
            cursor,
            done: false,
        }
    }
}

impl<T> Iterator for Iter<T> {
    type Item = Entry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = self.cursor.next();
        if next.is_none() {
            self.done = true;
            self.cursor.move_to_bottom();
        }
        next
    }
}

impl<T> FusedIterator for Iter<T> {}

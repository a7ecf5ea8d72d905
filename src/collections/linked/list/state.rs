use std::sync::Weak;

use log::{debug, trace};

use super::{
    AtBottom, AtTop, CursorKey, CursorNode, CursorPosition, EntryKey, ListShared, Node, OnEntry,
};
use crate::collections::arena::Arena;
use crate::collections::linked::{AlreadyInList, Entry, Link, NotInList};
use crate::util::id::ListId;
use crate::util::option::OptionExtension;
use crate::util::sync::MutexExtension;

/// Everything guarded by a list's lock: the entry chain, its endpoints and the three kinds of
/// cursor chain (parked at top, parked at bottom and bound to an entry).
///
/// The `force_*` methods are the unsynchronized linkage primitives. Holding `&mut ListState`
/// means the list lock is held, which is the only synchronization they rely on. Each entry's link
/// is locked briefly inside them, always after the list.
pub(crate) struct ListState<T> {
    pub id: ListId,
    pub owner: Weak<ListShared<T>>,
    pub entries: Arena<Node<T>>,
    pub cursors: Arena<CursorNode<T>>,
    pub first: Option<EntryKey<T>>,
    pub last: Option<EntryKey<T>>,
    pub top: Option<CursorKey<T>>,
    pub bottom: Option<CursorKey<T>>,
}

impl<T> ListState<T> {
    pub const fn new(id: ListId, owner: Weak<ListShared<T>>) -> ListState<T> {
        ListState {
            id,
            owner,
            entries: Arena::new(),
            cursors: Arena::new(),
            first: None,
            last: None,
            top: None,
            bottom: None,
        }
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn node(&self, key: EntryKey<T>) -> &Node<T> {
        self.entries.get(key).consistent("entry node")
    }

    pub fn node_mut(&mut self, key: EntryKey<T>) -> &mut Node<T> {
        self.entries.get_mut(key).consistent("entry node")
    }

    pub fn entry(&self, key: EntryKey<T>) -> Entry<T> {
        self.node(key).entry.clone()
    }

    /// Finds the key of an entry in this list, or [`None`] if it is detached or in another list.
    pub fn key_of(&self, entry: &Entry<T>) -> Option<EntryKey<T>> {
        let link = entry.core.link.acquire();
        match &*link {
            Some(Link { id, key, .. }) if *id == self.id => {
                debug_assert!(
                    self.entries.get(*key).is_some_and(|node| node.entry == *entry),
                    "entry link points at a node holding a different entry"
                );
                Some(*key)
            },
            _ => None,
        }
    }

    pub fn force_insert_at_top(&mut self, entry: &Entry<T>) -> Result<EntryKey<T>, AlreadyInList> {
        self.attach(entry, None, self.first)
    }

    pub fn force_insert_at_bottom(
        &mut self,
        entry: &Entry<T>,
    ) -> Result<EntryKey<T>, AlreadyInList> {
        self.attach(entry, self.last, None)
    }

    pub fn force_insert_after(
        &mut self,
        entry: &Entry<T>,
        after: EntryKey<T>,
    ) -> Result<EntryKey<T>, AlreadyInList> {
        let next = self.node(after).next;
        self.attach(entry, Some(after), next)
    }

    pub fn force_insert_before(
        &mut self,
        entry: &Entry<T>,
        before: EntryKey<T>,
    ) -> Result<EntryKey<T>, AlreadyInList> {
        let prev = self.node(before).prev;
        self.attach(entry, prev, Some(before))
    }

    /// Removes an entry, evicting its cursors to the predecessor position first, and detaches it.
    pub fn force_remove(&mut self, entry: &Entry<T>) -> Result<Entry<T>, NotInList> {
        let key = self.key_of(entry).ok_or(NotInList)?;
        Ok(self.remove_key(key))
    }

    pub fn remove_key(&mut self, key: EntryKey<T>) -> Entry<T> {
        let node = self.detach(key);
        // Cleared while the list is still locked, so the entry is never seen linked to a list
        // that no longer holds it.
        *node.entry.core.link.acquire() = None;
        trace!("{}: removed entry {key:?}", self.id);
        node.entry
    }

    /// Moves every entry of `source` onto the end of this list, keeping their order.
    ///
    /// Each entry's link is switched straight from `source` to this list under its own lock, so a
    /// concurrent insertion elsewhere never finds it detached halfway through.
    pub fn absorb(&mut self, source: &mut ListState<T>) -> usize {
        let mut moved = 0;
        while let Some(key) = source.first {
            let Node { entry, .. } = source.detach(key);
            let mut link = entry.core.link.acquire();
            let new_key = self.link_node(entry.clone(), self.last, None);
            *link = Some(Link::new(self.id, self.owner.clone(), new_key));
            drop(link);
            moved += 1;
        }
        moved
    }

    /// Every entry in order, for walking the list without holding its lock.
    pub fn entries(&self) -> Vec<Entry<T>> {
        let mut entries = Vec::with_capacity(self.len());
        let mut curr = self.first;
        while let Some(key) = curr {
            let node = self.node(key);
            entries.push(node.entry.clone());
            curr = node.next;
        }
        entries
    }

    fn attach(
        &mut self,
        entry: &Entry<T>,
        prev: Option<EntryKey<T>>,
        next: Option<EntryKey<T>>,
    ) -> Result<EntryKey<T>, AlreadyInList> {
        // Checked and set under one acquisition so two lists can't both claim the entry.
        let mut link = entry.core.link.acquire();
        if link.is_some() {
            return Err(AlreadyInList);
        }

        let key = self.link_node(entry.clone(), prev, next);
        *link = Some(Link::new(self.id, self.owner.clone(), key));
        trace!("{}: inserted entry {key:?}", self.id);
        Ok(key)
    }

    fn link_node(
        &mut self,
        entry: Entry<T>,
        prev: Option<EntryKey<T>>,
        next: Option<EntryKey<T>>,
    ) -> EntryKey<T> {
        let key = self.entries.insert(Node {
            entry,
            prev,
            next,
            cursors: None,
        });

        match prev {
            Some(prev) => self.node_mut(prev).next = Some(key),
            None => self.first = Some(key),
        }
        match next {
            Some(next) => self.node_mut(next).prev = Some(key),
            None => self.last = Some(key),
        }
        key
    }

    /// Unlinks an entry's node without touching the entry's own link.
    fn detach(&mut self, key: EntryKey<T>) -> Node<T> {
        let Node { prev, next, .. } = *self.node(key);
        self.evict_cursors(key, prev);

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.first = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.last = prev,
        }

        self.entries.remove(key).consistent("removed entry node")
    }

    /// Moves every cursor bound to `key` one step back: onto `prev`, or to the top if `key` is
    /// the first entry. The evicted cursors keep their relative order and go in front of any
    /// cursors already at the destination.
    fn evict_cursors(&mut self, key: EntryKey<T>, prev: Option<EntryKey<T>>) {
        let mut evicted = Vec::new();
        let mut curr = self.node_mut(key).cursors.take();
        while let Some(cursor) = curr {
            evicted.push(cursor);
            curr = self.cursor_node(cursor).next;
        }

        if evicted.is_empty() {
            return;
        }

        let dest = match prev {
            Some(prev) => OnEntry(prev),
            None => AtTop,
        };
        debug!("{}: evicting {} cursor(s) from {key:?} to {dest:?}", self.id, evicted.len());

        for cursor in evicted.into_iter().rev() {
            self.push_cursor(cursor, dest);
        }
    }
}

impl<T> ListState<T> {
    pub fn cursor_node(&self, key: CursorKey<T>) -> &CursorNode<T> {
        self.cursors.get(key).consistent("cursor node")
    }

    pub fn cursor_node_mut(&mut self, key: CursorKey<T>) -> &mut CursorNode<T> {
        self.cursors.get_mut(key).consistent("cursor node")
    }

    /// The position of a cursor, or [`None`] if it has been finished.
    pub fn cursor_position(&self, key: CursorKey<T>) -> Option<CursorPosition<T>> {
        self.cursors.get(key).map(|node| node.pos)
    }

    pub fn new_cursor(&mut self, pos: CursorPosition<T>) -> CursorKey<T> {
        let key = self.cursors.insert(CursorNode {
            pos,
            prev: None,
            next: None,
        });
        self.push_cursor(key, pos);
        key
    }

    pub fn drop_cursor(&mut self, key: CursorKey<T>) {
        self.unlink_cursor(key);
        self.cursors.remove(key);
    }

    /// Re-threads a cursor into the chain for `pos`.
    pub fn move_cursor(&mut self, key: CursorKey<T>, pos: CursorPosition<T>) {
        if self.cursor_node(key).pos == pos {
            return;
        }
        self.unlink_cursor(key);
        self.push_cursor(key, pos);
    }

    /// The position one step towards the bottom.
    ///
    /// # Panics
    /// Panics if `pos` is on an entry with no successor that isn't the last entry, which means
    /// the chain has been corrupted.
    pub fn after(&self, pos: CursorPosition<T>) -> CursorPosition<T> {
        match pos {
            AtTop => self.first.map_or(AtTop, OnEntry),
            AtBottom => AtBottom,
            OnEntry(key) => match self.node(key).next {
                Some(next) => OnEntry(next),
                None => {
                    assert!(
                        self.last == Some(key),
                        "Linked list corrupted: entry without a successor isn't the last entry!"
                    );
                    AtBottom
                },
            },
        }
    }

    /// The position one step towards the top.
    ///
    /// # Panics
    /// Panics if `pos` is on an entry with no predecessor that isn't the first entry, which means
    /// the chain has been corrupted.
    pub fn before(&self, pos: CursorPosition<T>) -> CursorPosition<T> {
        match pos {
            AtTop => AtTop,
            AtBottom => self.last.map_or(AtBottom, OnEntry),
            OnEntry(key) => match self.node(key).prev {
                Some(prev) => OnEntry(prev),
                None => {
                    assert!(
                        self.first == Some(key),
                        "Linked list corrupted: entry without a predecessor isn't the first entry!"
                    );
                    AtTop
                },
            },
        }
    }

    pub fn entry_at(&self, pos: CursorPosition<T>) -> Option<Entry<T>> {
        match pos {
            OnEntry(key) => Some(self.entry(key)),
            AtTop | AtBottom => None,
        }
    }

    fn chain_head_mut(&mut self, pos: CursorPosition<T>) -> &mut Option<CursorKey<T>> {
        match pos {
            AtTop => &mut self.top,
            AtBottom => &mut self.bottom,
            OnEntry(key) => &mut self.node_mut(key).cursors,
        }
    }

    fn push_cursor(&mut self, key: CursorKey<T>, pos: CursorPosition<T>) {
        let next = self.chain_head_mut(pos).replace(key);
        if let Some(next) = next {
            self.cursor_node_mut(next).prev = Some(key);
        }

        let node = self.cursor_node_mut(key);
        node.pos = pos;
        node.prev = None;
        node.next = next;
    }

    fn unlink_cursor(&mut self, key: CursorKey<T>) {
        let CursorNode { pos, prev, next } = *self.cursor_node(key);
        match prev {
            Some(prev) => self.cursor_node_mut(prev).next = next,
            None => *self.chain_head_mut(pos) = next,
        }
        if let Some(next) = next {
            self.cursor_node_mut(next).prev = prev;
        }
    }
}

impl<T> ListState<T> {
    /// Walks the entry chain in both directions and every cursor chain, panicking on the first
    /// broken invariant.
    #[cfg(test)]
    pub fn verify_links(&self) {
        let mut forward = 0;
        let mut cursors = 0;
        let mut prev = None;
        let mut curr = self.first;
        while let Some(key) = curr {
            let node = self.node(key);
            assert!(node.prev == prev, "prev link should point back along the chain");
            assert!(
                self.key_of(&node.entry) == Some(key),
                "entry link should name its own node"
            );
            cursors += self.verify_cursor_chain(node.cursors, OnEntry(key));
            forward += 1;
            assert!(forward <= self.len(), "chain should be acyclic");
            prev = curr;
            curr = node.next;
        }
        assert!(self.last == prev, "last should be the end of the forward walk");
        assert_eq!(forward, self.len(), "forward walk should visit every entry");

        let mut backward = 0;
        let mut curr = self.last;
        while let Some(key) = curr {
            backward += 1;
            curr = self.node(key).prev;
        }
        assert_eq!(backward, forward, "backward walk should match the forward walk");
        assert_eq!(self.first.is_none(), self.last.is_none());

        cursors += self.verify_cursor_chain(self.top, AtTop);
        cursors += self.verify_cursor_chain(self.bottom, AtBottom);
        assert_eq!(cursors, self.cursors.len(), "every cursor should be in exactly one chain");
    }

    #[cfg(test)]
    fn verify_cursor_chain(&self, head: Option<CursorKey<T>>, pos: CursorPosition<T>) -> usize {
        let mut count = 0;
        let mut prev = None;
        let mut curr = head;
        while let Some(key) = curr {
            let node = self.cursor_node(key);
            assert!(node.pos == pos, "cursor should be in the chain its position names");
            assert!(node.prev == prev, "cursor chain prev link should point back");
            count += 1;
            prev = curr;
            curr = node.next;
        }
        count
    }
}

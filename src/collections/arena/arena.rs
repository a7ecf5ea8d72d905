use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;

use derive_more::IsVariant;

/// A slot-based store handing out [`Key`]s that stay valid until their value is removed.
///
/// Removing a value bumps the generation of its slot, so a key held past removal is detected in
/// `O(1)` instead of silently resolving to whatever reuses the slot.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `insert` | `O(1)` (amortized) |
/// | `remove` | `O(1)` |
/// | `get/get_mut` | `O(1)` |
/// | `contains` | `O(1)` |
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free: Option<u32>,
    len: usize,
}

struct Slot<V> {
    generation: u32,
    state: SlotState<V>,
}

#[derive(IsVariant)]
enum SlotState<V> {
    Occupied(V),
    Vacant { next_free: Option<u32> },
}

use SlotState::*;

/// A generation-checked index into an [`Arena`]. Typed by the value it refers to, so keys for
/// entries and keys for cursors can't be mixed up.
pub(crate) struct Key<V> {
    index: u32,
    generation: u32,
    _phantom: PhantomData<fn() -> V>,
}

impl<V> Arena<V> {
    pub const fn new() -> Arena<V> {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of slots allocated, occupied or not.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, value: V) -> Key<V> {
        self.len += 1;
        match self.free {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                self.free = match slot.state {
                    Vacant { next_free } => next_free,
                    Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                slot.state = Occupied(value);
                Key::new(index, slot.generation)
            },
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("Arena capacity overflow!"));
                self.slots.push(Slot {
                    generation: 0,
                    state: Occupied(value),
                });
                Key::new(index, 0)
            },
        }
    }

    pub fn remove(&mut self, key: Key<V>) -> Option<V> {
        let next_free = self.free;
        let slot = self
            .slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation && slot.state.is_occupied())?;
        let old = mem::replace(&mut slot.state, Vacant { next_free });
        slot.generation = slot.generation.wrapping_add(1);
        self.free = Some(key.index);
        self.len -= 1;

        match old {
            Occupied(value) => Some(value),
            Vacant { .. } => None,
        }
    }

    pub fn get(&self, key: Key<V>) -> Option<&V> {
        match self.slots.get(key.index as usize) {
            Some(Slot { generation, state: Occupied(value) }) if *generation == key.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: Key<V>) -> Option<&mut V> {
        match self.slots.get_mut(key.index as usize) {
            Some(Slot { generation, state: Occupied(value) }) if *generation == key.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    pub fn contains(&self, key: Key<V>) -> bool {
        self.get(key).is_some()
    }

    /// Removes every value, leaving all outstanding keys stale.
    pub fn drain(&mut self) -> impl Iterator<Item = V> + '_ {
        self.free = None;
        self.len = 0;
        mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot.state {
                Occupied(value) => Some(value),
                Vacant { .. } => None,
            })
    }
}

impl<V> Default for Arena<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Key<V> {
    const fn new(index: u32, generation: u32) -> Key<V> {
        Key {
            index,
            generation,
            _phantom: PhantomData,
        }
    }
}

impl<V> Clone for Key<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Key<V> {}

impl<V> PartialEq for Key<V> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<V> Eq for Key<V> {}

impl<V> Hash for Key<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<V> Debug for Key<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}v{})", self.index, self.generation)
    }
}

use std::error;
use std::fmt::{self, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachedEntry;

impl fmt::Display for DetachedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Entry or cursor is not attached to any list!")
    }
}

impl error::Error for DetachedEntry {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyInList;

impl fmt::Display for AlreadyInList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Entry is already attached to a list!")
    }
}

impl error::Error for AlreadyInList {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotInList;

impl fmt::Display for NotInList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Entry is not a member of this list!")
    }
}

impl error::Error for NotInList {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossListMove;

impl fmt::Display for CrossListMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor can't be moved to a position in a different list!")
    }
}

impl error::Error for CrossListMove {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoisonedLock;

impl fmt::Display for PoisonedLock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Lock poisoned by a panic while a list or cursor was being modified!")
    }
}

impl error::Error for PoisonedLock {}

/// The ways that inserting relative to an existing entry can fail.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, TryInto, IsVariant)]
pub enum InsertError {
    /// The entry being inserted is already in a list.
    AlreadyInList(AlreadyInList),
    /// The anchor entry isn't in the list being inserted into.
    NotInList(NotInList),
    /// The anchor entry isn't in any list.
    Detached(DetachedEntry),
}

/// The ways that repositioning a cursor can fail.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, TryInto, IsVariant)]
pub enum MoveError {
    /// The cursor was finished, or the target entry or cursor is detached.
    Detached(DetachedEntry),
    /// The target belongs to a different list.
    CrossListMove(CrossListMove),
}

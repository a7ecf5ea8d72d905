//! The list types, and the arena they store their nodes in.
//!
//! # Method
//! Nodes never point at each other directly. Each list keeps its nodes in an arena and links them
//! by generation-checked keys, which keeps this crate free of unsafe code and makes "this handle
//! outlived its node" an `O(1)` check rather than a dangling pointer.

pub(crate) mod arena;
#[cfg(feature = "linked")]
pub mod linked;
#[cfg(feature = "simple")]
pub mod simple;

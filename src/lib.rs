//! A concurrent, cursor-aware doubly-linked list, written as the in-memory backbone for queues of
//! work items that many threads read, insert into and drain at once.
//!
//! # Purpose
//! A message engine holds its queued messages in order while independent consumers scan through
//! them, each at its own pace. Those consumers must never lose their place, even as the entries
//! around them are removed by someone else. [`LinkedList`](collections::linked::LinkedList) and
//! its [`Cursor`](collections::linked::Cursor) type do exactly that: removing an entry moves any
//! cursor sitting on it back to the previous entry, so every scan position stays valid.
//!
//! For call sites that only append and remove, without scanning, there is a lighter
//! [`SimpleLinkedList`](collections::simple::SimpleLinkedList) with no locking at all.
//!
//! # Method
//! Entries, cursors and lists refer to each other in a cycle (entry → list → cursor → entry). Rather
//! than raw pointers, each list stores its nodes in a generation-checked arena, and every
//! cross-reference is a key into it. A stale key simply fails to resolve, so "is this entry still
//! attached?" is a cheap check instead of pointer reasoning.
//!
//! A cursor's position is an explicit enum (top, bottom or on an entry), separate from the links
//! that thread it into the chain of cursors sharing that position.
//!
//! # Error Handling
//! Every error this crate reports is a misuse, like inserting an entry that's already in a list or
//! moving a finished cursor. Misuse should be loud, so each fallible method panics by default with
//! the error's message, and has a `try_` counterpart returning a [`Result`] for callers that would
//! rather handle it.
//!
//! Errors are small structs implementing [`Error`](std::error::Error), combined into enums where an
//! operation can fail in more than one way. A broken internal invariant is never returned as an
//! error: it panics, because nothing the caller does can make the structure trustworthy again.
//!
//! # Dependencies
//! This crate depends on some derive macros because they remove the need for some very repetitive
//! programming, and on the `log` facade for tracing structural changes. It installs no logger.
//!
//! # Features
//! - `linked`: the cursor-aware [`LinkedList`](collections::linked::LinkedList).
//! - `simple`: the unsynchronized [`SimpleLinkedList`](collections::simple::SimpleLinkedList).
//! - `collections-all` (default): both of the above.

// #![warn(missing_docs)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![forbid(unsafe_code)]
#![allow(clippy::module_inception)]

#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;

//! A generation-checked slot arena, the storage behind the cursor-aware
//! [`LinkedList`](crate::collections::linked::LinkedList) and the
//! [`SimpleLinkedList`](crate::collections::simple::SimpleLinkedList).
//!
//! Nodes refer to each other through [`Key`]s rather than pointers, so there is no unsafe code
//! and a link that outlived its node resolves to [`None`] instead of dangling.

mod arena;
mod tests;

pub(crate) use arena::*;

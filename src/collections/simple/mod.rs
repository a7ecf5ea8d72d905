//! A module containing [`SimpleLinkedList`] and its [`SimpleEntry`] handles: a reduced sibling of
//! the cursor-aware [`LinkedList`](crate::collections::linked::LinkedList) for call sites that
//! only append, remove known entries and peek at the front.

mod simple_list;

pub use simple_list::*;

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A process-unique identity for a list, used to check membership and to order lock acquisition
/// when two lists are locked together.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("list#{_0}")]
pub(crate) struct ListId(u64);

impl ListId {
    pub fn fresh() -> ListId {
        ListId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

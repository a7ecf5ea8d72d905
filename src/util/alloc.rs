use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A payload that counts how many of its clones have been dropped, for checking that lists and
/// their handles release entries.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Arc<AtomicUsize>);

impl CountedDrop {
    pub fn new() -> CountedDrop {
        CountedDrop(Arc::new(AtomicUsize::new(0)))
    }

    pub fn dropped(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Deref for CountedDrop {
    type Target = AtomicUsize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

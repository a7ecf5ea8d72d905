use std::sync::{LockResult, Mutex, MutexGuard};

use crate::util::error::PoisonedLock;
use crate::util::result::ResultExtension;

pub(crate) trait MutexExtension<T> {
    /// Locks the mutex, treating poisoning as fatal.
    ///
    /// A panic while one of these locks was held may have left a chain half-relinked, so the
    /// structure behind it can't be trusted any more.
    ///
    /// # Panics
    /// Panics with [`PoisonedLock`] if another thread panicked while holding the lock.
    fn acquire(&self) -> MutexGuard<'_, T>;

    /// Locks the mutex, returning [`PoisonedLock`] rather than panicking.
    fn try_acquire(&self) -> Result<MutexGuard<'_, T>, PoisonedLock>;
}

impl<T> MutexExtension<T> for Mutex<T> {
    #[track_caller]
    fn acquire(&self) -> MutexGuard<'_, T> {
        self.try_acquire().throw()
    }

    fn try_acquire(&self) -> Result<MutexGuard<'_, T>, PoisonedLock> {
        poisoned(self.lock())
    }
}

fn poisoned<G>(result: LockResult<G>) -> Result<G, PoisonedLock> {
    result.map_err(|_| PoisonedLock)
}

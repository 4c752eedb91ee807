//! # Spinlock
//!
//! A mutual-exclusion primitive built from a single
//! [`AtomicCell<i32>`](crate::AtomicCell) flag, and [`ScopedLock`], the guard
//! that holds it for exactly one scope.
//!
//! The flag has two states, `0` (unlocked) and `1` (locked):
//! - [`Spinlock::lock`] retries `compare_and_swap(0, 1)` until it succeeds,
//!   spinning with an exponential [`BackOff`] between attempts.
//! - [`Spinlock::try_lock`] makes exactly one attempt.
//! - [`Spinlock::unlock`] stores `0` unconditionally.
//!
//! ## Caller obligations
//! - The lock is **not reentrant**: locking it again from the thread that
//!   holds it spins forever.
//! - The lock is **not fair**: any waiter may win a given release.
//! - `unlock` performs no ownership check. Calling it without holding the
//!   lock breaks mutual exclusion for whoever does hold it. Prefer
//!   [`ScopedLock`], which pairs every acquire with exactly one release.
//! - Waiting burns CPU and never yields; keep critical sections short.
//!
//! ## Example
//! ```rust
//! use axiom_atomic::{ScopedLock, Spinlock};
//!
//! let lock = Spinlock::new();
//! {
//!     let _guard = ScopedLock::new(&lock);
//!     assert!(lock.is_locked());
//! } // released here
//! assert!(!lock.is_locked());
//! ```

use core::fmt;

use crate::backend::{Backend, BackendKind, Selected};
use crate::{AtomicCell, BackOff};

const UNLOCKED: i32 = 0;
const LOCKED: i32 = 1;

/// A busy-waiting mutual-exclusion lock with no payload.
pub struct Spinlock<B: Backend = Selected> {
    state: AtomicCell<i32, B>,
}

impl Spinlock {
    /// Creates an unlocked spinlock on the build's selected backend.
    #[inline]
    pub fn new() -> Self {
        Self::with_backend()
    }
}

impl<B: Backend> Spinlock<B> {
    /// Creates an unlocked spinlock on backend `B`.
    #[inline]
    pub fn with_backend() -> Self {
        Spinlock {
            state: AtomicCell::with_backend(UNLOCKED),
        }
    }

    /// Acquires the lock, spinning until it becomes available.
    #[inline]
    pub fn lock(&self) {
        if self.try_lock() {
            return;
        }

        let backoff = BackOff::new();
        let mut attempts: u64 = 1;
        loop {
            backoff.wait();
            attempts += 1;
            if self.try_lock() {
                break;
            }
        }

        tracing::trace!(attempts, backend = %B::KIND, "spinlock acquired after contention");
    }

    /// Makes a single attempt to acquire the lock.
    ///
    /// On backends with a weak compare-exchange this can fail even though
    /// the lock was free.
    #[inline]
    pub fn try_lock(&self) -> bool {
        self.state.compare_and_swap(UNLOCKED, LOCKED)
    }

    /// Tries to acquire the lock within `spins` attempts, backing off
    /// between them.
    #[inline]
    pub fn try_lock_for(&self, spins: usize) -> bool {
        let backoff = BackOff::new();
        for _ in 0..spins {
            if self.try_lock() {
                return true;
            }
            backoff.wait();
        }
        false
    }

    /// Releases the lock.
    ///
    /// Must only be called by the holder of a successful
    /// [`lock`](Self::lock) or [`try_lock`](Self::try_lock).
    #[inline]
    pub fn unlock(&self) {
        self.state.set(UNLOCKED);
    }

    /// Checks whether the lock is currently held.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state.load() == LOCKED
    }

    /// Acquires the lock and returns a guard that releases it on drop.
    #[inline]
    pub fn scoped(&self) -> ScopedLock<'_, B> {
        ScopedLock::new(self)
    }

    /// Like [`scoped`](Self::scoped), but makes a single attempt.
    #[inline]
    pub fn try_scoped(&self) -> Option<ScopedLock<'_, B>> {
        ScopedLock::try_new(self)
    }

    /// Runs `f` with the lock held, releasing it afterwards even if `f`
    /// panics.
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.scoped();
        f()
    }

    /// The backend of the underlying flag.
    #[inline(always)]
    pub const fn backend(&self) -> BackendKind {
        B::KIND
    }
}

impl Default for Spinlock {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for Spinlock<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spinlock")
            .field("locked", &self.is_locked())
            .field("backend", &B::KIND)
            .finish()
    }
}

/// Holds a [`Spinlock`] for exactly its own lifetime.
///
/// Acquired in [`ScopedLock::new`], released in `Drop`, including when the
/// scope is left by unwinding. A guard is bound to one lock and cannot be
/// cloned or re-pointed.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedLock<'a, B: Backend = Selected> {
    lock: &'a Spinlock<B>,
}

impl<'a, B: Backend> ScopedLock<'a, B> {
    /// Acquires `lock`, spinning until it is available.
    #[inline]
    pub fn new(lock: &'a Spinlock<B>) -> Self {
        lock.lock();
        ScopedLock { lock }
    }

    /// Makes a single attempt to acquire `lock`.
    #[inline]
    pub fn try_new(lock: &'a Spinlock<B>) -> Option<Self> {
        if lock.try_lock() {
            Some(ScopedLock { lock })
        } else {
            None
        }
    }

    /// Wraps a lock the caller already holds.
    #[inline]
    pub(crate) fn adopt(lock: &'a Spinlock<B>) -> Self {
        ScopedLock { lock }
    }
}

impl<B: Backend> Drop for ScopedLock<'_, B> {
    #[inline]
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

impl<B: Backend> fmt::Debug for ScopedLock<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedLock").field("lock", self.lock).finish()
    }
}

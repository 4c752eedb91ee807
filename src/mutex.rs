//! # SpinMutex
//!
//! A [`Spinlock`] that owns the data it protects. Locking returns a
//! [`SpinGuard`] that dereferences to the data and releases the lock when
//! dropped, so the data can only be reached while the lock is held.
//!
//! ## Example
//! ```rust
//! use axiom_atomic::SpinMutex;
//!
//! let counter = SpinMutex::new(0u32);
//! {
//!     let mut guard = counter.lock();
//!     *guard += 1;
//! } // unlocked here
//! assert_eq!(*counter.lock(), 1);
//! ```

use core::cell::UnsafeCell;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::backend::{Backend, Selected};
use crate::{ScopedLock, Spinlock};

/// A spin-based mutual exclusion lock around a value of type `T`.
pub struct SpinMutex<T, B: Backend = Selected> {
    lock: Spinlock<B>,
    data: UnsafeCell<T>,
}

/// Exclusive access to the data of a [`SpinMutex`], released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct SpinGuard<'a, T, B: Backend = Selected> {
    _scope: ScopedLock<'a, B>,
    data: &'a UnsafeCell<T>,
}

impl<T> SpinMutex<T> {
    /// Creates a new [`SpinMutex`] on the build's selected backend.
    ///
    /// # Example
    /// ```
    /// use axiom_atomic::SpinMutex;
    ///
    /// let lock = SpinMutex::new(123);
    /// assert_eq!(*lock.lock(), 123);
    /// ```
    #[inline]
    pub fn new(data: T) -> Self {
        Self::with_backend(data)
    }
}

impl<T, B: Backend> SpinMutex<T, B> {
    /// Creates a new [`SpinMutex`] on backend `B`.
    #[inline]
    pub fn with_backend(data: T) -> Self {
        SpinMutex {
            lock: Spinlock::with_backend(),
            data: UnsafeCell::new(data),
        }
    }

    /// Acquires the lock, spinning until it becomes available.
    #[inline]
    pub fn lock(&self) -> SpinGuard<'_, T, B> {
        SpinGuard {
            _scope: self.lock.scoped(),
            data: &self.data,
        }
    }

    /// Attempts to acquire the lock without spinning.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinGuard<'_, T, B>> {
        self.lock.try_scoped().map(|scope| SpinGuard {
            _scope: scope,
            data: &self.data,
        })
    }

    /// Tries to acquire the lock within a fixed number of attempts.
    #[inline]
    pub fn try_lock_for(&self, spins: usize) -> Option<SpinGuard<'_, T, B>> {
        if !self.lock.try_lock_for(spins) {
            return None;
        }
        Some(SpinGuard {
            // try_lock_for left the lock held by us.
            _scope: ScopedLock::adopt(&self.lock),
            data: &self.data,
        })
    }

    /// Runs a closure with exclusive access to the data.
    ///
    /// # Example
    /// ```
    /// use axiom_atomic::SpinMutex;
    /// let lock = SpinMutex::new(0i32);
    /// lock.with_lock(|data| {
    ///     *data += 1;
    /// });
    /// assert_eq!(lock.into_inner(), 1);
    /// ```
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Checks whether the lock is currently held.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Mutable access without locking; the `&mut self` borrow proves no
    /// guard exists.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Consumes the mutex and returns the data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    /// Releases the lock without a guard.
    ///
    /// # Safety
    /// - Only call this if the lock is held and the guard that holds it has
    ///   been forgotten (e.g. with [`core::mem::forget`]).
    /// - Any other use lets two guards alias the data.
    #[inline]
    pub unsafe fn force_unlock(&self) {
        self.lock.unlock();
    }
}

impl<T: Default> Default for SpinMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, B: Backend> fmt::Debug for SpinMutex<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SpinMutex");
        match self.try_lock() {
            Some(guard) => {
                d.field("data", &&*guard);
            }
            None => {
                d.field("data", &format_args!("<locked>"));
            }
        }
        d.finish()
    }
}

impl<T, B: Backend> Deref for SpinGuard<'_, T, B> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: the guard holds the lock for its whole lifetime.
        unsafe { &*self.data.get() }
    }
}

impl<T, B: Backend> DerefMut for SpinGuard<'_, T, B> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above, and `&mut self` makes this the only live borrow.
        unsafe { &mut *self.data.get() }
    }
}

impl<T: fmt::Debug, B: Backend> fmt::Debug for SpinGuard<'_, T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

// SAFETY: SpinMutex enforces mutual exclusion via the spinlock flag.
unsafe impl<T: Send, B: Backend> Send for SpinMutex<T, B> {}
unsafe impl<T: Send, B: Backend> Sync for SpinMutex<T, B> {}

// SAFETY: a guard hands out `&T` and `&mut T`.
unsafe impl<T: Sync, B: Backend> Sync for SpinGuard<'_, T, B> {}

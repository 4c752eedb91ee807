//! # BackOff
//!
//! Exponential spin backoff for the retry loop of
//! [`Spinlock::lock`](crate::Spinlock::lock).
//!
//! Each [`BackOff::wait`] issues a run of [`core::hint::spin_loop`] CPU
//! hints, doubling the run length up to a fixed ceiling. The waiting thread
//! never yields to the OS scheduler: the backoff only thins out how often a
//! contended cache line is hammered with compare-and-swap attempts.
//!
//! ## Example
//! ```rust
//! use axiom_atomic::{AtomicCell, BackOff};
//!
//! let flag = AtomicCell::new(0i32);
//! let backoff = BackOff::new();
//!
//! while !flag.compare_and_swap(0, 1) {
//!     backoff.wait();
//! }
//! assert_eq!(flag.load(), 1);
//! ```
//!
//! ## Behavior
//! - Each call to [`BackOff::wait`] spins for the current count, then doubles
//!   it, saturating at [`MAX_SPIN`].
//! - [`BackOff::relax`] halves the count; [`BackOff::reset`] restores the
//!   starting value.
//! - Under the `loom` feature a wait is a single yield, since loom has to
//!   schedule another thread for a spin loop to make progress.

use core::cell::Cell;

use crate::sync::spin_loop;

/// Maximum spin iteration count per wait.
pub const MAX_SPIN: u32 = 1 << 10;

/// Default starting spin count.
const START_VALUE: u32 = 1;

/// Bit shift applied during [`BackOff::relax`] to reduce spin intensity.
const RELAX_DIV_BIT_VAL: u32 = 1;

/// Per-waiter exponential spin state.
///
/// Not `Sync`: each spinning thread owns its own backoff state.
#[derive(Debug)]
pub struct BackOff {
    spin: Cell<u32>,
}

impl BackOff {
    /// Creates a new [`BackOff`] with the default starting spin count.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            spin: Cell::new(START_VALUE),
        }
    }

    /// Creates a new [`BackOff`] with a custom starting spin count, clamped
    /// to [`MAX_SPIN`].
    ///
    /// # Examples
    /// ```
    /// use axiom_atomic::BackOff;
    /// let b = BackOff::new_with(128);
    /// assert_eq!(b.current(), 128);
    /// ```
    #[inline(always)]
    pub const fn new_with(start: u32) -> Self {
        let start = if start > MAX_SPIN { MAX_SPIN } else { start };
        Self {
            spin: Cell::new(start),
        }
    }

    /// Spins for the current count, then doubles it up to [`MAX_SPIN`].
    #[inline]
    pub fn wait(&self) {
        let end = self.spin.get();

        #[cfg(not(feature = "loom"))]
        for _ in 0..end {
            spin_loop();
        }

        #[cfg(feature = "loom")]
        spin_loop();

        let next = (end << 1).clamp(1, MAX_SPIN);
        if next == MAX_SPIN && end < MAX_SPIN {
            tracing::trace!(spins = MAX_SPIN, "backoff saturated");
        }
        self.spin.set(next);
    }

    /// Halves the current spin count.
    ///
    /// # Examples
    /// ```
    /// use axiom_atomic::BackOff;
    /// let b = BackOff::new_with(64);
    /// b.relax();
    /// assert_eq!(b.current(), 32);
    /// ```
    #[inline(always)]
    pub fn relax(&self) {
        self.spin.set(self.spin.get() >> RELAX_DIV_BIT_VAL);
    }

    /// The number of spins the next [`wait`](Self::wait) will issue.
    #[inline(always)]
    pub fn current(&self) -> u32 {
        self.spin.get()
    }

    /// Resets the spin count to the default starting value.
    #[inline(always)]
    pub fn reset(&self) {
        self.spin.set(START_VALUE);
    }

    /// Resets the spin count to `spin`, clamped to [`MAX_SPIN`].
    #[inline(always)]
    pub fn reset_to(&self, spin: u32) {
        self.spin.set(spin.min(MAX_SPIN));
    }
}

impl Default for BackOff {
    fn default() -> Self {
        Self::new()
    }
}

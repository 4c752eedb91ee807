//! # AtomicCell
//!
//! A fixed-width integer cell whose every operation is atomic and
//! sequentially consistent: all operations on all cells, across all threads,
//! are observed in one global order that agrees with each thread's program
//! order.
//!
//! The cell is generic over its [`Backend`]. The default, [`Selected`], is
//! chosen once per build; [`AtomicCell::with_backend`] pins a specific one,
//! which is how the backends are checked against each other.
//!
//! ## Return conventions
//! Both [`increment`](AtomicCell::increment) and
//! [`decrement`](AtomicCell::decrement) return the value *after* the
//! operation. Both wrap on overflow.
//!
//! ## Example
//! ```rust
//! use axiom_atomic::AtomicCell;
//!
//! let hits = AtomicCell::new(0u32);
//! assert_eq!(hits.increment(), 1);
//! assert_eq!(hits.decrement(), 0);
//!
//! assert!(!hits.compare_and_swap(5, 9));
//! while !hits.compare_and_swap(0, 9) {}
//! assert_eq!(hits.load(), 9);
//! ```

use core::fmt;

use crate::backend::{Backend, BackendKind, Selected};
use crate::Integer;

/// An integer cell with sequentially-consistent atomic operations.
///
/// Obtain shared access through `&AtomicCell` (for example behind an `Arc`
/// or in a `static`-like owner); the cell itself is `Send + Sync`.
pub struct AtomicCell<T: Integer, B: Backend = Selected> {
    cell: B::Cell<T>,
}

impl<T: Integer> AtomicCell<T> {
    /// Creates a cell on the build's selected backend.
    #[inline]
    pub fn new(value: T) -> Self {
        Self::with_backend(value)
    }

    /// Creates a zero-initialised cell on the build's selected backend.
    #[inline]
    pub fn zeroed() -> Self {
        Self::new(T::ZERO)
    }
}

impl<T: Integer, B: Backend> AtomicCell<T, B> {
    /// Creates a cell on backend `B`.
    ///
    /// ```rust
    /// use axiom_atomic::{AtomicCell, Interlocked};
    ///
    /// let cell = AtomicCell::<u8, Interlocked>::with_backend(u8::MAX);
    /// assert_eq!(cell.increment(), 0);
    /// ```
    #[inline]
    pub fn with_backend(value: T) -> Self {
        Self {
            cell: B::new(value),
        }
    }

    /// Atomically adds one and returns the new value.
    #[inline]
    pub fn increment(&self) -> T {
        B::increment(&self.cell)
    }

    /// Atomically subtracts one and returns the new value.
    #[inline]
    pub fn decrement(&self) -> T {
        B::decrement(&self.cell)
    }

    /// Replaces the value with `new` iff it currently equals `expected`.
    ///
    /// Returns whether the swap happened. On the builtin and library
    /// backends the underlying compare-exchange is weak and may fail even
    /// when the value matches; retry in a loop when success is required.
    #[inline]
    pub fn compare_and_swap(&self, expected: T, new: T) -> bool {
        B::compare_and_swap(&self.cell, expected, new)
    }

    /// Unconditionally stores `new`.
    #[inline]
    pub fn set(&self, new: T) {
        B::set(&self.cell, new)
    }

    /// Returns the current value.
    ///
    /// The value is a snapshot; anything computed from it is not atomic with
    /// respect to later operations on the cell.
    #[inline]
    pub fn load(&self) -> T {
        B::load(&self.cell)
    }

    /// Consumes the cell and returns its value.
    #[inline]
    pub fn into_inner(self) -> T {
        B::into_inner(self.cell)
    }

    /// The backend this cell runs on.
    #[inline(always)]
    pub const fn backend(&self) -> BackendKind {
        B::KIND
    }
}

impl<T: Integer> Default for AtomicCell<T> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Integer> From<T> for AtomicCell<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Integer, B: Backend> fmt::Debug for AtomicCell<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicCell")
            .field("value", &self.load())
            .field("backend", &B::KIND)
            .finish()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::backend::{Builtin, Interlocked, Library};
    use std::sync::Arc;
    use std::thread;

    fn cas_until_swapped<T: Integer, B: Backend>(cell: &AtomicCell<T, B>, expected: T, new: T) {
        while !cell.compare_and_swap(expected, new) {
            assert_eq!(cell.load(), expected, "CAS failed with a mismatched value");
        }
    }

    fn single_threaded<B: Backend>() {
        let a = AtomicCell::<i32, B>::with_backend(0);
        assert_eq!(a.load(), 0);
        a.increment();
        a.increment();
        assert_eq!(a.increment(), 3);

        let b = AtomicCell::<i32, B>::with_backend(2);
        b.decrement();
        b.decrement();
        assert_eq!(b.decrement(), -1);
        assert_eq!(b.load(), -1);

        let c = AtomicCell::<i32, B>::with_backend(5);
        assert!(!c.compare_and_swap(4, 9));
        assert_eq!(c.load(), 5);
        cas_until_swapped(&c, 5, 9);
        assert_eq!(c.load(), 9);
    }

    #[test]
    fn test_single_threaded_builtin() {
        single_threaded::<Builtin>();
    }

    #[test]
    fn test_single_threaded_interlocked() {
        single_threaded::<Interlocked>();
    }

    #[test]
    fn test_single_threaded_library() {
        single_threaded::<Library>();
    }

    #[test]
    fn test_default_is_zero_on_selected_backend() {
        let a: AtomicCell<u64> = AtomicCell::default();
        assert_eq!(a.load(), 0);
        assert_eq!(a.backend(), Selected::KIND);
    }

    #[test]
    fn test_set_then_load_bounds() {
        let a = AtomicCell::new(0i16);
        for v in [i16::MIN, -1, 0, 1, 12_345, i16::MAX] {
            a.set(v);
            assert_eq!(a.load(), v);
        }
    }

    #[test]
    fn test_into_inner_and_from() {
        let a = AtomicCell::from(41u8);
        a.increment();
        assert_eq!(a.into_inner(), 42);
    }

    #[test]
    fn test_debug_shows_value() {
        let a = AtomicCell::<u32, Library>::with_backend(7);
        let s = format!("{:?}", a);
        assert!(s.contains("value: 7"));
        assert!(s.contains("Library"));
    }

    #[test]
    fn test_concurrent_increments() {
        let a = Arc::new(AtomicCell::new(0i32));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let a = a.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        a.increment();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(a.load(), 8 * 10_000);
    }
}

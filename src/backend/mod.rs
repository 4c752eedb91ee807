//! # Backends
//!
//! An [`AtomicCell`](crate::AtomicCell) delegates every operation to a
//! [`Backend`]. Three interchangeable implementations exist:
//!
//! - [`Builtin`]: plain integer storage driven by the compiler's native
//!   atomic instructions.
//! - [`Interlocked`]: an interlocked-intrinsic table with per-width
//!   dispatch; narrow widths without a native increment/decrement fall back
//!   to a compare-exchange retry loop.
//! - [`Library`]: the standard atomic library types (or loom's, under the
//!   `loom` feature).
//!
//! All three are compiled on every supported target and must be
//! observationally identical. Exactly one of them is [`Selected`] as the
//! default backend of the crate; the choice is made once, in `build.rs`, and
//! surfaces here as the `axiom_backend` cfg.

use core::cell::UnsafeCell;
use core::fmt;

use crate::Integer;

pub(crate) mod builtin;
pub(crate) mod interlocked;
pub(crate) mod library;

mod private {
    pub trait Sealed {}
}

/// The capability set every backend provides.
///
/// Every operation is sequentially consistent. `increment` and `decrement`
/// both return the value *after* the operation and wrap on overflow.
pub trait Backend: private::Sealed + Sized + 'static {
    /// Which backend this is, for diagnostics.
    const KIND: BackendKind;

    /// The storage of one cell holding a `T`.
    type Cell<T: Integer>: Send + Sync;

    fn new<T: Integer>(value: T) -> Self::Cell<T>;
    fn increment<T: Integer>(cell: &Self::Cell<T>) -> T;
    fn decrement<T: Integer>(cell: &Self::Cell<T>) -> T;
    fn compare_and_swap<T: Integer>(cell: &Self::Cell<T>, expected: T, new: T) -> bool;
    fn set<T: Integer>(cell: &Self::Cell<T>, new: T);
    fn load<T: Integer>(cell: &Self::Cell<T>) -> T;

    /// Consumes the storage and returns the final value.
    fn into_inner<T: Integer>(cell: Self::Cell<T>) -> T;
}

/// Names a [`Backend`] at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Builtin,
    Interlocked,
    Library,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Builtin => "builtin",
            BackendKind::Interlocked => "interlocked",
            BackendKind::Library => "library",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler atomic instructions over plain storage.
#[derive(Debug, Clone, Copy)]
pub enum Builtin {}

/// Interlocked intrinsics with width dispatch.
#[derive(Debug, Clone, Copy)]
pub enum Interlocked {}

/// Standard atomic library types.
#[derive(Debug, Clone, Copy)]
pub enum Library {}

impl private::Sealed for Builtin {}
impl private::Sealed for Interlocked {}
impl private::Sealed for Library {}

/// The backend this build uses by default.
#[cfg(axiom_backend = "builtin")]
pub type Selected = Builtin;

/// The backend this build uses by default.
#[cfg(axiom_backend = "interlocked")]
pub type Selected = Interlocked;

/// The backend this build uses by default.
#[cfg(axiom_backend = "library")]
pub type Selected = Library;

#[cfg(not(any(
    axiom_backend = "builtin",
    axiom_backend = "interlocked",
    axiom_backend = "library"
)))]
compile_error!("no atomic backend was selected for this target");

/// Plain integer storage shared by the builtin and interlocked backends.
///
/// Aligned to 8 so that any width can be viewed as the matching
/// `core::sync::atomic` type, including 64-bit values on 32-bit targets.
#[repr(C, align(8))]
pub struct RawCell<T> {
    value: UnsafeCell<T>,
}

// SAFETY: the storage is only ever touched through atomic instructions
// while shared; `into_inner` requires ownership.
unsafe impl<T: Integer> Sync for RawCell<T> {}

impl<T> RawCell<T> {
    #[inline(always)]
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.value.get()
    }

    #[inline(always)]
    pub(crate) fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

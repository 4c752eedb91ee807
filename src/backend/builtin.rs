//! Compiler atomic instructions over plain integer storage.
//!
//! The cell is a bare `T` in a [`RawCell`]; each operation views it as the
//! `core::sync::atomic` type of the same width and issues one sequentially
//! consistent instruction. Compare-and-swap uses the weak form.

use core::sync::atomic::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicU8,
    Ordering::SeqCst,
};

use super::{Backend, BackendKind, Builtin, RawCell};
use crate::Integer;

/// Per-width builtin operations.
pub trait Builtins: Sized {
    fn add_fetch(cell: &RawCell<Self>, value: Self) -> Self;
    fn sub_fetch(cell: &RawCell<Self>, value: Self) -> Self;
    fn compare_exchange_weak(cell: &RawCell<Self>, expected: Self, new: Self) -> bool;
    fn store(cell: &RawCell<Self>, value: Self);
    fn load(cell: &RawCell<Self>) -> Self;
}

/// The `core::sync::atomic` type of the same width as `Self`.
trait Native: Sized {
    type Atomic;

    /// # Safety
    /// `ptr` must be valid for the returned lifetime, aligned for
    /// `Self::Atomic`, and only ever accessed atomically while shared.
    unsafe fn from_ptr<'a>(ptr: *mut Self) -> &'a Self::Atomic;
}

/// Views the cell as its atomic type for the duration of the borrow.
#[inline(always)]
fn atomic<T: Native>(cell: &RawCell<T>) -> &T::Atomic {
    // SAFETY: RawCell is 8-byte aligned, which covers every atomic width,
    // and its storage is private to the backends, which only reach it
    // through these views.
    unsafe { T::from_ptr(cell.as_ptr()) }
}

macro_rules! impl_builtins {
    ($($t:ty => $atomic:ident),* $(,)?) => {
        $(
            impl Native for $t {
                type Atomic = $atomic;

                #[inline(always)]
                unsafe fn from_ptr<'a>(ptr: *mut $t) -> &'a $atomic {
                    $atomic::from_ptr(ptr)
                }
            }

            impl Builtins for $t {
                #[inline(always)]
                fn add_fetch(cell: &RawCell<$t>, value: $t) -> $t {
                    atomic(cell).fetch_add(value, SeqCst).wrapping_add(value)
                }

                #[inline(always)]
                fn sub_fetch(cell: &RawCell<$t>, value: $t) -> $t {
                    atomic(cell).fetch_sub(value, SeqCst).wrapping_sub(value)
                }

                #[inline(always)]
                fn compare_exchange_weak(cell: &RawCell<$t>, expected: $t, new: $t) -> bool {
                    atomic(cell)
                        .compare_exchange_weak(expected, new, SeqCst, SeqCst)
                        .is_ok()
                }

                #[inline(always)]
                fn store(cell: &RawCell<$t>, value: $t) {
                    atomic(cell).store(value, SeqCst)
                }

                #[inline(always)]
                fn load(cell: &RawCell<$t>) -> $t {
                    atomic(cell).load(SeqCst)
                }
            }
        )*
    };
}

impl_builtins!(
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    i64 => AtomicI64,
    u64 => AtomicU64,
);

impl Backend for Builtin {
    const KIND: BackendKind = BackendKind::Builtin;

    type Cell<T: Integer> = RawCell<T>;

    #[inline]
    fn new<T: Integer>(value: T) -> RawCell<T> {
        RawCell::new(value)
    }

    #[inline]
    fn increment<T: Integer>(cell: &RawCell<T>) -> T {
        <T as Builtins>::add_fetch(cell, T::ONE)
    }

    #[inline]
    fn decrement<T: Integer>(cell: &RawCell<T>) -> T {
        <T as Builtins>::sub_fetch(cell, T::ONE)
    }

    #[inline]
    fn compare_and_swap<T: Integer>(cell: &RawCell<T>, expected: T, new: T) -> bool {
        <T as Builtins>::compare_exchange_weak(cell, expected, new)
    }

    #[inline]
    fn set<T: Integer>(cell: &RawCell<T>, new: T) {
        Builtins::store(cell, new)
    }

    #[inline]
    fn load<T: Integer>(cell: &RawCell<T>) -> T {
        Builtins::load(cell)
    }

    #[inline]
    fn into_inner<T: Integer>(cell: RawCell<T>) -> T {
        cell.into_inner()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_sub_fetch_return_new_value() {
        let cell = RawCell::new(10u16);
        assert_eq!(u16::add_fetch(&cell, 5), 15);
        assert_eq!(u16::sub_fetch(&cell, 20), u16::MAX - 4);
        assert_eq!(Builtins::load(&cell), u16::MAX - 4);
    }

    #[test]
    fn test_weak_cas_eventually_succeeds() {
        let cell = RawCell::new(-3i64);
        while !i64::compare_exchange_weak(&cell, -3, 7) {}
        assert_eq!(Builtins::load(&cell), 7);
        assert!(!i64::compare_exchange_weak(&cell, -3, 9));
        assert_eq!(Builtins::load(&cell), 7);
    }
}

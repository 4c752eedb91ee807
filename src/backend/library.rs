//! Standard atomic library backend.
//!
//! Stores each value in the library atomic of its width (`core`, or loom's
//! under the `loom` feature) and forwards every operation with `SeqCst`.

use crate::sync::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicU8,
    Ordering::SeqCst,
};

use super::{Backend, BackendKind, Library};
use crate::Integer;

/// Ties an integer type to its library atomic.
pub trait LibraryAtomic: Sized {
    type Atomic: Send + Sync;

    fn atomic_new(value: Self) -> Self::Atomic;
    fn atomic_fetch_add(atomic: &Self::Atomic, value: Self) -> Self;
    fn atomic_fetch_sub(atomic: &Self::Atomic, value: Self) -> Self;
    fn atomic_compare_exchange_weak(atomic: &Self::Atomic, current: Self, new: Self) -> bool;
    fn atomic_store(atomic: &Self::Atomic, value: Self);
    fn atomic_load(atomic: &Self::Atomic) -> Self;
}

macro_rules! impl_library_atomic {
    ($($t:ty => $atomic:ident),* $(,)?) => {
        $(
            impl LibraryAtomic for $t {
                type Atomic = $atomic;

                #[inline(always)]
                fn atomic_new(value: $t) -> $atomic {
                    $atomic::new(value)
                }

                #[inline(always)]
                fn atomic_fetch_add(atomic: &$atomic, value: $t) -> $t {
                    atomic.fetch_add(value, SeqCst)
                }

                #[inline(always)]
                fn atomic_fetch_sub(atomic: &$atomic, value: $t) -> $t {
                    atomic.fetch_sub(value, SeqCst)
                }

                #[inline(always)]
                fn atomic_compare_exchange_weak(atomic: &$atomic, current: $t, new: $t) -> bool {
                    atomic.compare_exchange_weak(current, new, SeqCst, SeqCst).is_ok()
                }

                #[inline(always)]
                fn atomic_store(atomic: &$atomic, value: $t) {
                    atomic.store(value, SeqCst)
                }

                #[inline(always)]
                fn atomic_load(atomic: &$atomic) -> $t {
                    atomic.load(SeqCst)
                }
            }
        )*
    };
}

impl_library_atomic!(
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    i64 => AtomicI64,
    u64 => AtomicU64,
);

impl Backend for Library {
    const KIND: BackendKind = BackendKind::Library;

    type Cell<T: Integer> = <T as LibraryAtomic>::Atomic;

    #[inline]
    fn new<T: Integer>(value: T) -> Self::Cell<T> {
        T::atomic_new(value)
    }

    #[inline]
    fn increment<T: Integer>(cell: &Self::Cell<T>) -> T {
        T::atomic_fetch_add(cell, T::ONE).wrapping_add(T::ONE)
    }

    #[inline]
    fn decrement<T: Integer>(cell: &Self::Cell<T>) -> T {
        T::atomic_fetch_sub(cell, T::ONE).wrapping_sub(T::ONE)
    }

    #[inline]
    fn compare_and_swap<T: Integer>(cell: &Self::Cell<T>, expected: T, new: T) -> bool {
        T::atomic_compare_exchange_weak(cell, expected, new)
    }

    #[inline]
    fn set<T: Integer>(cell: &Self::Cell<T>, new: T) {
        T::atomic_store(cell, new)
    }

    #[inline]
    fn load<T: Integer>(cell: &Self::Cell<T>) -> T {
        T::atomic_load(cell)
    }

    #[inline]
    fn into_inner<T: Integer>(cell: Self::Cell<T>) -> T {
        T::atomic_load(&cell)
    }
}

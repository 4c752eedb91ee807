//! Interlocked backend.
//!
//! Each integer type is routed to the intrinsic set of its width. Widths
//! whose increment/decrement intrinsics are missing (8-bit everywhere,
//! 64-bit on 32-bit targets) go through [`compare_exchange_loop`] instead.
//! Loads use the interlocked-read idiom, a compare-exchange of zero with
//! zero, so that every access is a full barrier.

mod intrinsics;

use super::{Backend, BackendKind, Interlocked, RawCell};
use crate::Integer;

/// Per-width interlocked operations, with interlocked return conventions.
pub trait InterlockedOps: Sized {
    /// Returns the incremented value.
    fn increment(cell: &RawCell<Self>) -> Self;
    /// Returns the decremented value.
    fn decrement(cell: &RawCell<Self>) -> Self;
    /// Returns the initial value; the swap happened iff it equals `comparand`.
    fn compare_exchange(cell: &RawCell<Self>, exchange: Self, comparand: Self) -> Self;
    /// Returns the initial value.
    fn exchange(cell: &RawCell<Self>, value: Self) -> Self;
}

/// Read-modify-write through compare-exchange, retried until no other
/// writer slipped in between the read and the exchange. Returns the value
/// written.
#[inline]
fn compare_exchange_loop<T: Integer>(cell: &RawCell<T>, op: impl Fn(T) -> T) -> T {
    let mut current = <T as InterlockedOps>::compare_exchange(cell, T::ZERO, T::ZERO);
    loop {
        let next = op(current);
        let observed = <T as InterlockedOps>::compare_exchange(cell, next, current);
        if observed == current {
            return next;
        }
        current = observed;
    }
}

// The `as` casts below reinterpret between a type and its same-width signed
// carrier, which is lossless in both directions.
macro_rules! interlocked_width {
    (native $carrier:ty => $inc:ident, $dec:ident, $xchg:ident, $cmpxchg:ident: $($t:ty),*) => {
        $(
            impl InterlockedOps for $t {
                #[inline(always)]
                fn increment(cell: &RawCell<$t>) -> $t {
                    // SAFETY: RawCell is aligned and only accessed atomically.
                    unsafe { intrinsics::$inc(cell.as_ptr().cast::<$carrier>()) as $t }
                }

                #[inline(always)]
                fn decrement(cell: &RawCell<$t>) -> $t {
                    // SAFETY: as above.
                    unsafe { intrinsics::$dec(cell.as_ptr().cast::<$carrier>()) as $t }
                }

                interlocked_width!(@exchange $carrier => $xchg, $cmpxchg: $t);
            }
        )*
    };
    (emulated $carrier:ty => $xchg:ident, $cmpxchg:ident: $($t:ty),*) => {
        $(
            impl InterlockedOps for $t {
                #[inline(always)]
                fn increment(cell: &RawCell<$t>) -> $t {
                    compare_exchange_loop(cell, |v: $t| v.wrapping_add(1))
                }

                #[inline(always)]
                fn decrement(cell: &RawCell<$t>) -> $t {
                    compare_exchange_loop(cell, |v: $t| v.wrapping_sub(1))
                }

                interlocked_width!(@exchange $carrier => $xchg, $cmpxchg: $t);
            }
        )*
    };
    (@exchange $carrier:ty => $xchg:ident, $cmpxchg:ident: $t:ty) => {
        #[inline(always)]
        fn compare_exchange(cell: &RawCell<$t>, exchange: $t, comparand: $t) -> $t {
            // SAFETY: RawCell is aligned and only accessed atomically.
            unsafe {
                intrinsics::$cmpxchg(
                    cell.as_ptr().cast::<$carrier>(),
                    exchange as $carrier,
                    comparand as $carrier,
                ) as $t
            }
        }

        #[inline(always)]
        fn exchange(cell: &RawCell<$t>, value: $t) -> $t {
            // SAFETY: as above.
            unsafe { intrinsics::$xchg(cell.as_ptr().cast::<$carrier>(), value as $carrier) as $t }
        }
    };
}

interlocked_width!(emulated i8 => exchange8, compare_exchange8: i8, u8);
interlocked_width!(native i16 => increment16, decrement16, exchange16, compare_exchange16: i16, u16);
interlocked_width!(native i32 => increment32, decrement32, exchange32, compare_exchange32: i32, u32);

#[cfg(target_pointer_width = "64")]
interlocked_width!(native i64 => increment64, decrement64, exchange64, compare_exchange64: i64, u64);

#[cfg(not(target_pointer_width = "64"))]
interlocked_width!(emulated i64 => exchange64, compare_exchange64: i64, u64);

impl Backend for Interlocked {
    const KIND: BackendKind = BackendKind::Interlocked;

    type Cell<T: Integer> = RawCell<T>;

    #[inline]
    fn new<T: Integer>(value: T) -> RawCell<T> {
        RawCell::new(value)
    }

    #[inline]
    fn increment<T: Integer>(cell: &RawCell<T>) -> T {
        <T as InterlockedOps>::increment(cell)
    }

    #[inline]
    fn decrement<T: Integer>(cell: &RawCell<T>) -> T {
        <T as InterlockedOps>::decrement(cell)
    }

    #[inline]
    fn compare_and_swap<T: Integer>(cell: &RawCell<T>, expected: T, new: T) -> bool {
        <T as InterlockedOps>::compare_exchange(cell, new, expected) == expected
    }

    #[inline]
    fn set<T: Integer>(cell: &RawCell<T>, new: T) {
        <T as InterlockedOps>::exchange(cell, new);
    }

    #[inline]
    fn load<T: Integer>(cell: &RawCell<T>) -> T {
        <T as InterlockedOps>::compare_exchange(cell, T::ZERO, T::ZERO)
    }

    #[inline]
    fn into_inner<T: Integer>(cell: RawCell<T>) -> T {
        cell.into_inner()
    }
}

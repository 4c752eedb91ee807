//! The fixed-width integer types an [`AtomicCell`](crate::AtomicCell) can hold.

use core::fmt::{Debug, Display};
use core::hash::Hash;

use crate::backend::builtin::Builtins;
use crate::backend::interlocked::InterlockedOps;
use crate::backend::library::LibraryAtomic;

mod private {
    pub trait Sealed {}
}

/// An integer of width 1, 2, 4 or 8 bytes.
///
/// Implemented for `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64` and `u64`
/// only. The trait is sealed: every implementor must be supported by every
/// backend, so that swapping the backend never changes which cells compile.
pub trait Integer:
    private::Sealed
    + Copy
    + Eq
    + Ord
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
    + Builtins
    + InterlockedOps
    + LibraryAtomic
{
    /// Storage width in bytes.
    const WIDTH: usize;
    const ZERO: Self;
    const ONE: Self;
    const MIN: Self;
    const MAX: Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl private::Sealed for $t {}

            impl Integer for $t {
                const WIDTH: usize = core::mem::size_of::<$t>();
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                #[inline(always)]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }

                #[inline(always)]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$t>::wrapping_sub(self, rhs)
                }
            }
        )*
    };
}

impl_integer!(i8, u8, i16, u16, i32, u32, i64, u64);

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::Integer;

    fn width_of<T: Integer>() -> usize {
        T::WIDTH
    }

    #[test]
    fn test_widths() {
        assert_eq!(width_of::<i8>(), 1);
        assert_eq!(width_of::<u16>(), 2);
        assert_eq!(width_of::<i32>(), 4);
        assert_eq!(width_of::<u64>(), 8);
    }

    #[test]
    fn test_wrapping_at_bounds() {
        assert_eq!(Integer::wrapping_add(i8::MAX, 1), i8::MIN);
        assert_eq!(Integer::wrapping_sub(u32::MIN, 1), u32::MAX);
    }
}

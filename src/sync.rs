//! Synchronization primitives with optional loom support.
//!
//! The library backend and the spin hints go through this module so that
//! the `loom` feature can swap in model-checked atomics while production
//! builds keep the `core` ones.

#[cfg(not(feature = "loom"))]
pub use core::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64};

#[cfg(feature = "loom")]
pub use loom::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64};

// Loom only models the 32/64-bit cells; narrow widths stay on core under loom.
pub use core::sync::atomic::{AtomicI16, AtomicI8, AtomicU16, AtomicU8};

pub use core::sync::atomic::Ordering;

/// Spin loop hint for busy waiting.
///
/// Under loom this yields instead, which loom needs to make progress on
/// spin loops while model checking.
#[inline]
pub fn spin_loop() {
    #[cfg(not(feature = "loom"))]
    core::hint::spin_loop();

    #[cfg(feature = "loom")]
    loom::thread::yield_now();
}

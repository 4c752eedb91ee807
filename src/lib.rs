//! # axiom-atomic 🌀
//!
//! A lightweight, **`no_std`-compatible** crate providing a sequentially
//! consistent **atomic integer cell** and a **spinlock** built on top of it.
//!
//! The crate includes:
//!
//! - [`AtomicCell<T>`] — an 8/16/32/64-bit integer cell with atomic
//!   increment, decrement, compare-and-swap, set and load.
//! - [`Spinlock`] — a busy-waiting lock made of one `AtomicCell<i32>`.
//! - [`ScopedLock`] — a guard that holds a [`Spinlock`] for one scope.
//! - [`SpinMutex<T>`] — a [`Spinlock`] that owns the data it protects.
//! - [`BackOff`] — the exponential spin backoff used while waiting.
//!
//! ## ✨ Features
//!
//! - ✅ `no_std` compatible (uses `core` only)
//! - 🧩 Three interchangeable atomic [backends](backend), one selected per build
//! - 🔒 Compare-and-swap spinlock with RAII guard
//! - 🧪 Optional `loom` feature for model-checking the lock protocol
//!
//! ## 🚀 Quick Example
//!
//! ```rust
//! use axiom_atomic::{AtomicCell, ScopedLock, Spinlock};
//!
//! // Example 1: an atomic counter
//! let hits = AtomicCell::new(0u64);
//! assert_eq!(hits.increment(), 1);
//!
//! // Example 2: a scoped spinlock
//! let lock = Spinlock::new();
//! {
//!     let _guard = ScopedLock::new(&lock);
//!     assert!(lock.is_locked());
//! } // automatically unlocked when the guard is dropped
//! assert!(!lock.is_locked());
//! ```
//!
//! ## 🧠 Design
//!
//! ### AtomicCell
//!
//! Every operation is `SeqCst`. `increment` and `decrement` both return the
//! value *after* the operation. The storage and instructions come from a
//! [`Backend`]: compiler builtins, interlocked intrinsics with per-width
//! dispatch, or the standard atomic library. `build.rs` picks one as
//! [`Selected`] from the target ABI, or from a `backend-*` feature.
//!
//! ### Spinlock
//!
//! `0` is unlocked and `1` is locked. `lock` retries `compare_and_swap(0, 1)`
//! with a [`BackOff`] between attempts; `unlock` stores `0`.
//!
//! ## ⚠️ Safety & Usage Notes
//!
//! - Prefer `Spinlock` for **short critical sections** only.
//! - Waiters spin and never yield to the scheduler.
//! - `Spinlock` is **neither reentrant nor fair**.
//! - `Spinlock::unlock` does not check ownership; prefer [`ScopedLock`].
//!
//! ## 📦 Feature flags
//!
//! - **`std`** (default) — enables `tracing/std`.
//! - **`loom`** — library backend on loom atomics, for model checking.
//! - **`backend-builtin`**, **`backend-interlocked`**, **`backend-library`**
//!   — override the backend selection.
//! - **`demo`** — builds the `axiom-stress` binary.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod atomic;
pub mod backend;
pub mod backoff;
pub mod int;
pub mod mutex;
pub mod spinlock;

mod sync;

pub use atomic::AtomicCell;
pub use backend::{Backend, BackendKind, Builtin, Interlocked, Library, Selected};
pub use backoff::BackOff;
pub use int::Integer;
pub use mutex::{SpinGuard, SpinMutex};
pub use spinlock::{ScopedLock, Spinlock};

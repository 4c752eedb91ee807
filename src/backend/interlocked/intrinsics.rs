//! Interlocked intrinsic bindings.
//!
//! One explicitly typed entry point per operation and width, in the shape of
//! the classic interlocked family: increment/decrement return the resulting
//! value, exchange and compare-exchange return the initial value, and
//! compare-exchange takes `(destination, exchange, comparand)`.
//!
//! There is no 8-bit increment or decrement, and the 64-bit ones
//! only exist on 64-bit targets; the backend emulates the gaps.
//!
//! # Safety
//!
//! Every function takes a raw pointer that must be non-null, aligned for its
//! width, valid for the duration of the call, and never accessed
//! non-atomically while another thread may touch it.

#![allow(clippy::missing_safety_doc)]

use core::sync::atomic::{AtomicI16, AtomicI32, AtomicI64, AtomicI8, Ordering::SeqCst};

#[inline(always)]
pub unsafe fn increment16(addend: *mut i16) -> i16 {
    AtomicI16::from_ptr(addend).fetch_add(1, SeqCst).wrapping_add(1)
}

#[inline(always)]
pub unsafe fn increment32(addend: *mut i32) -> i32 {
    AtomicI32::from_ptr(addend).fetch_add(1, SeqCst).wrapping_add(1)
}

#[cfg(target_pointer_width = "64")]
#[inline(always)]
pub unsafe fn increment64(addend: *mut i64) -> i64 {
    AtomicI64::from_ptr(addend).fetch_add(1, SeqCst).wrapping_add(1)
}

#[inline(always)]
pub unsafe fn decrement16(addend: *mut i16) -> i16 {
    AtomicI16::from_ptr(addend).fetch_sub(1, SeqCst).wrapping_sub(1)
}

#[inline(always)]
pub unsafe fn decrement32(addend: *mut i32) -> i32 {
    AtomicI32::from_ptr(addend).fetch_sub(1, SeqCst).wrapping_sub(1)
}

#[cfg(target_pointer_width = "64")]
#[inline(always)]
pub unsafe fn decrement64(addend: *mut i64) -> i64 {
    AtomicI64::from_ptr(addend).fetch_sub(1, SeqCst).wrapping_sub(1)
}

#[inline(always)]
pub unsafe fn exchange8(target: *mut i8, value: i8) -> i8 {
    AtomicI8::from_ptr(target).swap(value, SeqCst)
}

#[inline(always)]
pub unsafe fn exchange16(target: *mut i16, value: i16) -> i16 {
    AtomicI16::from_ptr(target).swap(value, SeqCst)
}

#[inline(always)]
pub unsafe fn exchange32(target: *mut i32, value: i32) -> i32 {
    AtomicI32::from_ptr(target).swap(value, SeqCst)
}

#[inline(always)]
pub unsafe fn exchange64(target: *mut i64, value: i64) -> i64 {
    AtomicI64::from_ptr(target).swap(value, SeqCst)
}

#[inline(always)]
pub unsafe fn compare_exchange8(destination: *mut i8, exchange: i8, comparand: i8) -> i8 {
    match AtomicI8::from_ptr(destination).compare_exchange(comparand, exchange, SeqCst, SeqCst) {
        Ok(initial) | Err(initial) => initial,
    }
}

#[inline(always)]
pub unsafe fn compare_exchange16(destination: *mut i16, exchange: i16, comparand: i16) -> i16 {
    match AtomicI16::from_ptr(destination).compare_exchange(comparand, exchange, SeqCst, SeqCst) {
        Ok(initial) | Err(initial) => initial,
    }
}

#[inline(always)]
pub unsafe fn compare_exchange32(destination: *mut i32, exchange: i32, comparand: i32) -> i32 {
    match AtomicI32::from_ptr(destination).compare_exchange(comparand, exchange, SeqCst, SeqCst) {
        Ok(initial) | Err(initial) => initial,
    }
}

#[inline(always)]
pub unsafe fn compare_exchange64(destination: *mut i64, exchange: i64, comparand: i64) -> i64 {
    match AtomicI64::from_ptr(destination).compare_exchange(comparand, exchange, SeqCst, SeqCst) {
        Ok(initial) | Err(initial) => initial,
    }
}

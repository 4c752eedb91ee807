//! Every backend must behave identically: these properties run once per
//! backend, over narrow and wide widths.

#![cfg(not(feature = "loom"))]

use std::sync::Arc;
use std::thread;

use axiom_atomic::{AtomicCell, Backend, Builtin, Integer, Interlocked, Library};

const NUM_THREADS: usize = 100;
const NUM_ITERATIONS: usize = 1000;

fn cas_until_swapped<T: Integer, B: Backend>(cell: &AtomicCell<T, B>, expected: T, new: T) {
    while !cell.compare_and_swap(expected, new) {
        assert_eq!(cell.load(), expected);
    }
}

fn concurrent_increments<B: Backend>() {
    let a = Arc::new(AtomicCell::<i32, B>::with_backend(0));
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let a = a.clone();
            thread::spawn(move || {
                for _ in 0..NUM_ITERATIONS {
                    a.increment();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(a.load(), (NUM_THREADS * NUM_ITERATIONS) as i32);
}

fn concurrent_decrements<B: Backend>() {
    let a = Arc::new(AtomicCell::<i64, B>::with_backend(0));
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let a = a.clone();
            thread::spawn(move || {
                for _ in 0..NUM_ITERATIONS {
                    a.decrement();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(a.load(), -((NUM_THREADS * NUM_ITERATIONS) as i64));
}

/// Half the threads add, half subtract, on a cell narrow enough to wrap many
/// times over; modular arithmetic still has to land on the net sum.
fn mixed_narrow<B: Backend>() {
    let a = Arc::new(AtomicCell::<u8, B>::with_backend(7));
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let a = a.clone();
            thread::spawn(move || {
                for _ in 0..NUM_ITERATIONS {
                    if i % 2 == 0 {
                        a.increment();
                    } else {
                        a.decrement();
                    }
                }
                for _ in 0..i {
                    a.increment();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    // Net: +0 from the paired loops, plus 0 + 1 + ... + 15 = 120.
    assert_eq!(a.load(), 7u8.wrapping_add(120));
}

fn concurrent_cas_counter<B: Backend>() {
    let a = Arc::new(AtomicCell::<u16, B>::with_backend(0));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let a = a.clone();
            thread::spawn(move || {
                for _ in 0..NUM_ITERATIONS {
                    loop {
                        let current = a.load();
                        if a.compare_and_swap(current, current.wrapping_add(3)) {
                            break;
                        }
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(a.load(), (8 * NUM_ITERATIONS * 3) as u16);
}

fn cas_semantics<B: Backend>() {
    let a = AtomicCell::<i8, B>::with_backend(5);
    assert!(!a.compare_and_swap(4, 9));
    assert_eq!(a.load(), 5);
    cas_until_swapped(&a, 5, 9);
    assert_eq!(a.load(), 9);

    let b = AtomicCell::<u64, B>::with_backend(u64::MAX);
    assert!(!b.compare_and_swap(0, 1));
    assert_eq!(b.load(), u64::MAX);
    cas_until_swapped(&b, u64::MAX, 0);
    assert_eq!(b.load(), 0);
}

fn set_load_roundtrip<T: Integer, B: Backend>(values: &[T]) {
    let a = AtomicCell::<T, B>::with_backend(T::ZERO);
    for &v in [T::MIN, T::MAX, T::ZERO].iter().chain(values) {
        a.set(v);
        assert_eq!(a.load(), v);
    }
}

fn wrapping_at_bounds<T: Integer, B: Backend>() {
    let a = AtomicCell::<T, B>::with_backend(T::MAX);
    assert_eq!(a.increment(), T::MIN);
    assert_eq!(a.decrement(), T::MAX);

    let b = AtomicCell::<T, B>::with_backend(T::MIN);
    assert_eq!(b.decrement(), T::MAX);
    assert_eq!(b.increment(), T::MIN);
}

fn all_widths<B: Backend>() {
    set_load_roundtrip::<i8, B>(&[-100, 100]);
    set_load_roundtrip::<u8, B>(&[1, 200]);
    set_load_roundtrip::<i16, B>(&[-30_000, 12_345]);
    set_load_roundtrip::<u16, B>(&[65_000]);
    set_load_roundtrip::<i32, B>(&[-1, 42]);
    set_load_roundtrip::<u32, B>(&[0xDEAD_BEEF]);
    set_load_roundtrip::<i64, B>(&[i64::MIN + 1, 1 << 40]);
    set_load_roundtrip::<u64, B>(&[u64::MAX - 1, 1 << 63]);

    wrapping_at_bounds::<i8, B>();
    wrapping_at_bounds::<u8, B>();
    wrapping_at_bounds::<i16, B>();
    wrapping_at_bounds::<u16, B>();
    wrapping_at_bounds::<i32, B>();
    wrapping_at_bounds::<u32, B>();
    wrapping_at_bounds::<i64, B>();
    wrapping_at_bounds::<u64, B>();
}

macro_rules! backend_suite {
    ($($module:ident => $backend:ty),* $(,)?) => {
        $(
            mod $module {
                use super::*;

                #[test]
                fn increments_are_not_lost() {
                    concurrent_increments::<$backend>();
                }

                #[test]
                fn decrements_are_not_lost() {
                    concurrent_decrements::<$backend>();
                }

                #[test]
                fn mixed_narrow_updates_sum() {
                    mixed_narrow::<$backend>();
                }

                #[test]
                fn cas_loop_counter_is_exact() {
                    concurrent_cas_counter::<$backend>();
                }

                #[test]
                fn cas_swaps_only_on_match() {
                    cas_semantics::<$backend>();
                }

                #[test]
                fn every_width_roundtrips_and_wraps() {
                    all_widths::<$backend>();
                }
            }
        )*
    };
}

backend_suite!(
    builtin => Builtin,
    interlocked => Interlocked,
    library => Library,
);

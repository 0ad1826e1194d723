//! Detecting misuse with `try_free()`.
//!
//! `free()` silently ignores pointers it cannot use. `try_free()` performs the same operation
//! but says why a call had no effect.

use std::ptr;

use fixed_pool::{DropPolicy, FixedObjectPool};

fn main() {
    // With this policy, dropping the pool while objects are still live is a bug we want to hear about.
    let mut pool = FixedObjectPool::<u64, 4>::builder()
        .drop_policy(DropPolicy::MustNotDropItems)
        .build();

    let mut other_pool = FixedObjectPool::<u64, 4>::new();

    let Some(item) = pool.allocate_and_construct(|| 42) else {
        unreachable!("a new pool has room");
    };
    let Some(foreign) = other_pool.allocate_and_construct(|| 7) else {
        unreachable!("a new pool has room");
    };

    let candidates = [
        ("live object", item.as_ptr()),
        ("same object again", item.as_ptr()),
        ("null", ptr::null_mut()),
        ("object from another pool", foreign.as_ptr()),
        ("middle of a slot", item.as_ptr().cast::<u8>().wrapping_add(3).cast::<u64>()),
    ];

    for (description, candidate) in candidates {
        match pool.try_free(candidate) {
            Ok(()) => println!("{description}: freed"),
            Err(error) => println!("{description}: ignored ({error})"),
        }
    }

    println!("{pool:?}");
}

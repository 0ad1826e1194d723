//! Scripted usage of the `fixed_pool` crate:
//!
//! * Creating a pool with room for two objects.
//! * Filling it and observing allocation failure.
//! * Freeing an object and reusing its slot.
//! * Freeing objects through stale and null pointers.
#![allow(
    clippy::approx_constant,
    reason = "the script stores this exact value, not an approximation of pi"
)]

use std::ptr;

use fixed_pool::FixedObjectPool;

struct Foo {
    i: i32,
    f: f32,
}

impl Drop for Foo {
    fn drop(&mut self) {
        println!("Dropping Foo {{ i: {}, f: {} }}", self.i, self.f);
    }
}

fn main() {
    let mut pool = FixedObjectPool::<Foo, 2>::new();

    let Some(f0) = pool.allocate_and_construct(|| Foo { i: 10, f: 25.0 }) else {
        unreachable!("a new pool has room");
    };
    let Some(f1) = pool.allocate_and_construct(|| Foo { i: 1048, f: 3.141 }) else {
        unreachable!("a new pool of two has room for a second object");
    };

    println!(
        "Pool holds {} of {} objects, {} bytes each",
        pool.len(),
        pool.capacity(),
        pool.slot_stride()
    );

    // The pool is full, so allocation fails. That is an ordinary outcome, not an error.
    if pool
        .allocate_and_construct(|| Foo { i: 1048, f: 3.141 })
        .is_some()
    {
        unreachable!("the pool is full");
    }

    println!("Pool is full, freeing the first object");
    pool.free(f0.as_ptr());

    let Some(f3) = pool.allocate_and_construct(|| Foo { i: 1048, f: 3.141 }) else {
        unreachable!("we just freed a slot");
    };
    println!(
        "Reused slot {} at the same address: {}",
        f3.index(),
        f3.as_ptr() == f0.as_ptr()
    );

    // `f0` now addresses the object constructed as `f3`.
    pool.free(f0.as_ptr());
    pool.free(f1.as_ptr());

    // Ignored without any effect.
    pool.free(ptr::null());

    println!("Pool is empty: {}", pool.is_empty());
}

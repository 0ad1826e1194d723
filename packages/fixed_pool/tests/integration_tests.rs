//! Integration tests for the `fixed_pool` package.
//!
//! These exercise the public contract of `FixedObjectPool` the way a caller would, including
//! the full allocate/free scenario and long randomized allocate/free sequences.

use std::cell::Cell;
use std::ptr;
use std::rc::Rc;

use fixed_pool::{Error, FixedObjectPool, SlotHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Foo {
    i: i32,
    f: f32,
    drops: Rc<Cell<usize>>,
}

impl Foo {
    fn new(i: i32, f: f32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            i,
            f,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for Foo {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
#[allow(
    clippy::approx_constant,
    reason = "the scenario stores this exact value, not an approximation of pi"
)]
fn two_slot_scenario() {
    let drops = Rc::new(Cell::new(0));
    let mut pool = FixedObjectPool::<Foo, 2>::new();

    let a = pool
        .allocate_and_construct(|| Foo::new(10, 25.0, &drops))
        .unwrap();
    let b = pool
        .allocate_and_construct(|| Foo::new(1048, 3.141, &drops))
        .unwrap();

    let a_foo = pool.get(a).unwrap();
    assert_eq!(a_foo.i, 10);
    assert!((a_foo.f - 25.0).abs() < f32::EPSILON);

    // Pool is full.
    assert!(
        pool.allocate_and_construct(|| Foo::new(1048, 3.141, &drops))
            .is_none()
    );
    assert_eq!(drops.get(), 0);

    pool.free(a.as_ptr());
    assert_eq!(drops.get(), 1);

    let c = pool
        .allocate_and_construct(|| Foo::new(1048, 3.141, &drops))
        .unwrap();
    assert_eq!(c.as_ptr(), a.as_ptr());

    let c_foo = pool.get(c).unwrap();
    assert_eq!(c_foo.i, 1048);
    assert!((c_foo.f - 3.141).abs() < f32::EPSILON);

    // Frees the re-allocated object through the old handle's address.
    pool.free(a.as_ptr());
    pool.free(b.as_ptr());
    pool.free(ptr::null());

    assert_eq!(drops.get(), 3);
    assert!(pool.is_empty());
}

#[test]
fn capacity_one_reuses_slot_address() {
    let mut pool = FixedObjectPool::<u128, 1>::new();

    let first = pool.allocate_and_construct(|| 1).unwrap();
    pool.free(first.as_ptr());
    let second = pool.allocate_and_construct(|| 2).unwrap();

    assert_eq!(first.as_ptr(), second.as_ptr());
    assert_eq!(second.index(), 0);
}

#[test]
fn capacity_two_exhausts_then_reuses_freed_slot() {
    let mut pool = FixedObjectPool::<String, 2>::new();

    let a = pool.allocate_and_construct(|| "a".to_string()).unwrap();
    let b = pool.allocate_and_construct(|| "b".to_string()).unwrap();
    assert!(pool.allocate_and_construct(|| "c".to_string()).is_none());

    pool.free(b.as_ptr());

    let c = pool.allocate_and_construct(|| "c".to_string()).unwrap();
    assert_eq!(c.as_ptr(), b.as_ptr());
    assert_eq!(pool.get(a).map(String::as_str), Some("a"));
    assert_eq!(pool.get(c).map(String::as_str), Some("c"));
}

#[test]
fn rejected_frees_leave_pool_untouched() {
    let drops = Rc::new(Cell::new(0));
    let mut pool = FixedObjectPool::<Foo, 3>::new();
    let mut other = FixedObjectPool::<Foo, 3>::new();

    let ours = pool
        .allocate_and_construct(|| Foo::new(1, 1.0, &drops))
        .unwrap();
    let theirs = other
        .allocate_and_construct(|| Foo::new(2, 2.0, &drops))
        .unwrap();

    assert_eq!(pool.try_free(ptr::null()), Err(Error::Null));
    assert!(matches!(
        pool.try_free(theirs.as_ptr()),
        Err(Error::OutOfRange { .. })
    ));
    assert_eq!(
        pool.try_free(ours.as_ptr().wrapping_add(1)),
        Err(Error::Vacant { index: 1 })
    );

    assert_eq!(drops.get(), 0);
    assert_eq!(pool.len(), 1);
    assert_eq!(other.len(), 1);
    assert_eq!(pool.get(ours).map(|foo| foo.i), Some(1));
}

#[test]
fn randomized_sequences_never_exceed_capacity() {
    const CAPACITY: usize = 5;

    let drops = Rc::new(Cell::new(0));
    let mut constructed = 0_usize;

    let mut rng = StdRng::seed_from_u64(0x5EED_F00D);
    let mut pool = FixedObjectPool::<Foo, CAPACITY>::new();
    let mut live: Vec<SlotHandle<Foo>> = Vec::new();

    for step in 0..10_000 {
        if rng.random_bool(0.55) {
            let value = i32::try_from(step).unwrap();

            match pool.allocate_and_construct(|| Foo::new(value, 0.0, &drops)) {
                Some(handle) => {
                    constructed += 1;

                    // First-fit: no lower slot may be vacant.
                    assert!((0..handle.index()).all(|index| pool.is_slot_occupied(index)));
                    assert!(live.iter().all(|other| other.as_ptr() != handle.as_ptr()));

                    live.push(handle);
                }
                None => assert_eq!(live.len(), CAPACITY),
            }
        } else if !live.is_empty() {
            let handle = live.swap_remove(rng.random_range(0..live.len()));
            let drops_before = drops.get();

            assert_eq!(pool.try_free(handle.as_ptr()), Ok(()));
            assert_eq!(drops.get(), drops_before + 1);
        } else {
            pool.free(ptr::null());
        }

        assert!(pool.len() <= CAPACITY);
        assert_eq!(pool.len(), live.len());
    }

    drop(pool);
    assert_eq!(drops.get(), constructed);
}

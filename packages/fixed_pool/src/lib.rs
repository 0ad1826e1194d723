#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A fixed-capacity object pool for objects of a single type.
//!
//! [`FixedObjectPool<T, N>`] reserves storage for exactly `N` objects of type `T` when it is
//! created and never allocates again. It is meant for code that needs a bounded, predictable
//! memory region instead of general-purpose heap allocation, such as embedded, real-time or
//! latency-sensitive code.
//!
//! # Key Features
//!
//! - **Fixed capacity**: one storage block for `N` objects, reserved up front and never resized
//! - **First-fit allocation**: the lowest-indexed vacant slot is always used first
//! - **In-place construction**: objects are constructed directly in pool storage
//! - **Stable addresses**: objects never move, even when the pool value is moved
//! - **Forgiving free**: null, foreign, mid-slot and already-freed pointers are ignored
//! - **Diagnostics on request**: [`FixedObjectPool::try_free()`] reports why a free had no effect
//! - **Drop policies**: choose whether dropping a pool with live objects is allowed
//!
//! # Example
//!
//! ```rust
//! use fixed_pool::FixedObjectPool;
//!
//! struct Foo {
//!     i: i32,
//!     f: f32,
//! }
//!
//! let mut pool = FixedObjectPool::<Foo, 2>::new();
//!
//! let a = pool.allocate_and_construct(|| Foo { i: 10, f: 25.0 }).unwrap();
//! let b = pool
//!     .allocate_and_construct(|| Foo { i: 1048, f: 3.141 })
//!     .unwrap();
//!
//! // The pool is full, so allocation fails without constructing anything.
//! assert!(pool.allocate_and_construct(|| Foo { i: 1048, f: 3.141 }).is_none());
//!
//! pool.free(a.as_ptr());
//!
//! // The freed slot is handed out again.
//! let c = pool
//!     .allocate_and_construct(|| Foo { i: 1048, f: 3.141 })
//!     .unwrap();
//! assert_eq!(c.as_ptr(), a.as_ptr());
//! assert_eq!(pool.get(c).map(|foo| foo.i), Some(1048));
//!
//! pool.free(a.as_ptr());
//! pool.free(b.as_ptr());
//!
//! // Freeing a null pointer is harmless.
//! pool.free(std::ptr::null());
//!
//! assert!(pool.is_empty());
//! ```
//!
//! # Logging
//!
//! The pool emits `tracing` events: pool creation and exhaustion at debug level, slot claims
//! and releases at trace level. Rejected `free()` calls are not logged.

mod builder;
mod drop_policy;
mod error;
mod handle;
mod occupancy;
mod pool;

pub use builder::*;
pub use drop_policy::*;
pub use error::*;
pub use handle::*;
pub(crate) use occupancy::*;
pub use pool::*;

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{DropPolicy, FixedObjectPool};

/// Builder for creating an instance of [`FixedObjectPool`].
///
/// You only need the builder to customize the pool configuration. The capacity is part of the
/// pool type, so the only setting here is the drop policy. [`FixedObjectPool::new()`][1] uses the
/// defaults.
///
/// # Examples
///
/// ```
/// use fixed_pool::{DropPolicy, FixedObjectPool};
///
/// let pool = FixedObjectPool::<u32, 16>::builder()
///     .drop_policy(DropPolicy::MayDropItems)
///     .build();
///
/// assert_eq!(pool.capacity(), 16);
/// ```
///
/// [1]: FixedObjectPool::new
#[must_use]
pub struct FixedObjectPoolBuilder<T, const N: usize> {
    drop_policy: DropPolicy,

    _item: PhantomData<T>,
}

impl<T, const N: usize> fmt::Debug for FixedObjectPoolBuilder<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedObjectPoolBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &N)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T, const N: usize> FixedObjectPoolBuilder<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how to treat objects that
    /// are still live when the pool is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_pool::{DropPolicy, FixedObjectPool};
    ///
    /// let pool = FixedObjectPool::<u32, 4>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero or `T` is zero-sized.
    #[must_use]
    pub fn build(self) -> FixedObjectPool<T, N> {
        FixedObjectPool::new_inner(self.drop_policy)
    }
}

/// Determines what happens to live objects when the pool itself is dropped.
///
/// By default, the pool drops any objects that were never freed.
///
/// # Examples
///
/// ```
/// use fixed_pool::{DropPolicy, FixedObjectPool};
///
/// let pool = FixedObjectPool::<u32, 8>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool drops its live objects when the pool is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The pool panics if it still holds live objects when it is dropped.
    ///
    /// Useful when callers hand out raw pointers to pooled objects and every object is
    /// expected to be explicitly freed before the pool goes away.
    MustNotDropItems,
}

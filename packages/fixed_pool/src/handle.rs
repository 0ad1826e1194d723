use std::any::type_name;
use std::fmt;
use std::ptr::NonNull;

/// A non-owning handle to an object stored in a [`FixedObjectPool`][1].
///
/// Returned by [`allocate_and_construct()`][2] and consumed by [`free()`][3] (via
/// [`as_ptr()`][4]). Handles are plain views into pool memory: copying one does not copy the
/// object and dropping one does not free the slot.
///
/// The pool validates every handle or pointer it is given, so a stale or foreign handle never
/// corrupts pool state. However, once a slot is freed and reused, an old handle to that slot
/// addresses the new occupant. Do not keep handles past the matching `free()`.
///
/// # Example
///
/// ```rust
/// use fixed_pool::FixedObjectPool;
///
/// let mut pool = FixedObjectPool::<u64, 4>::new();
///
/// let handle = pool.allocate_and_construct(|| 42).unwrap();
/// assert_eq!(handle.index(), 0);
/// assert_eq!(pool.get(handle), Some(&42));
///
/// pool.free(handle.as_ptr());
/// assert_eq!(pool.get(handle), None);
/// ```
///
/// [1]: crate::FixedObjectPool
/// [2]: crate::FixedObjectPool::allocate_and_construct
/// [3]: crate::FixedObjectPool::free
/// [4]: Self::as_ptr
pub struct SlotHandle<T> {
    ptr: NonNull<T>,
    index: usize,
}

impl<T> SlotHandle<T> {
    #[must_use]
    pub(crate) fn new(ptr: NonNull<T>, index: usize) -> Self {
        Self { ptr, index }
    }

    /// Pointer to the object in pool storage.
    ///
    /// The pointer stays valid until the object is freed or the pool is dropped. Moving the pool
    /// does not invalidate it.
    #[must_use]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Index of the slot the object occupies.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for SlotHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotHandle<T> {}

impl<T> PartialEq for SlotHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for SlotHandle<T> {}

impl<T> fmt::Debug for SlotHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotHandle")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("index", &self.index)
            .field("ptr", &self.ptr)
            .finish()
    }
}

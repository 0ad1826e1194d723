use std::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error};
use std::any::type_name;
use std::fmt;
use std::ptr::NonNull;
use std::thread;

use num_integer::Integer;
use tracing::{debug, trace};

use crate::{DropPolicy, Error, FixedObjectPoolBuilder, OccupancyMap, Result, SlotHandle};

/// An object pool with room for exactly `N` objects of type `T`.
///
/// All storage is reserved in a single block when the pool is created. Allocating an object
/// claims the lowest-indexed vacant slot and constructs the object in place; freeing an object
/// runs its destructor in place and makes the slot available again. The pool never grows.
///
/// # Handles and pointers
///
/// [`allocate_and_construct()`][1] returns a [`SlotHandle`], a copyable view of the slot. The
/// storage block does not move for the lifetime of the pool, even when the pool value itself is
/// moved, so the pointer inside a handle stays valid until the object is freed.
///
/// [`free()`][2] takes a raw pointer and accepts anything: null, pointers into other memory,
/// pointers into the middle of a slot and pointers to slots that were already freed are all
/// ignored without touching pool state. Use [`try_free()`][3] to find out why a call had no
/// effect.
///
/// # Thread safety
///
/// The pool may be moved to another thread if `T` is [`Send`] but it cannot be shared between
/// threads. Wrap it in a `Mutex` if several threads need to allocate from it.
///
/// # Example
///
/// ```rust
/// use fixed_pool::FixedObjectPool;
///
/// let mut pool = FixedObjectPool::<String, 2>::new();
///
/// let hello = pool.allocate_and_construct(|| "Hello".to_string()).unwrap();
/// let world = pool.allocate_and_construct(|| "World".to_string()).unwrap();
///
/// // The pool is full.
/// assert!(pool.allocate_and_construct(|| "!".to_string()).is_none());
///
/// pool.free(hello.as_ptr());
///
/// // The freed slot is handed out again.
/// let again = pool.allocate_and_construct(|| "Again".to_string()).unwrap();
/// assert_eq!(again.as_ptr(), hello.as_ptr());
/// # pool.free(world.as_ptr());
/// # pool.free(again.as_ptr());
/// ```
///
/// [1]: Self::allocate_and_construct
/// [2]: Self::free
/// [3]: Self::try_free
pub struct FixedObjectPool<T, const N: usize> {
    /// Start of the storage block, `N` consecutive slots of `size_of::<T>()` bytes each.
    /// Zero-filled on allocation. Released only when the pool is dropped.
    storage: NonNull<T>,

    occupancy: OccupancyMap<N>,

    drop_policy: DropPolicy,
}

impl<T, const N: usize> FixedObjectPool<T, N> {
    /// # Panics
    ///
    /// Panics if `N` is zero or `T` is zero-sized.
    #[must_use]
    pub(crate) fn new_inner(drop_policy: DropPolicy) -> Self {
        assert!(N > 0, "FixedObjectPool must have non-zero capacity");
        assert!(
            size_of::<T>() > 0,
            "FixedObjectPool must have non-zero item size"
        );

        let layout = Self::layout();

        // SAFETY: The layout is a valid array layout for `T` and is not zero-sized
        // (guarded by the assertions above).
        let block = unsafe { alloc_zeroed(layout) };

        let storage =
            NonNull::new(block.cast::<T>()).unwrap_or_else(|| handle_alloc_error(layout));

        debug!(
            item_type = type_name::<T>(),
            capacity = N,
            slot_stride = size_of::<T>(),
            "created fixed object pool"
        );

        Self {
            storage,
            occupancy: OccupancyMap::new(),
            drop_policy,
        }
    }

    /// Creates a new, empty pool with the default configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// let pool = FixedObjectPool::<u64, 8>::new();
    ///
    /// assert!(pool.is_empty());
    /// assert_eq!(pool.capacity(), 8);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero or `T` is zero-sized.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a new pool with a custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{DropPolicy, FixedObjectPool};
    ///
    /// let pool = FixedObjectPool::<u64, 8>::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    /// ```
    pub fn builder() -> FixedObjectPoolBuilder<T, N> {
        FixedObjectPoolBuilder::new()
    }

    #[must_use]
    fn layout() -> Layout {
        Layout::array::<T>(N).expect("simple flat array layout must be calculable")
    }

    /// Total size of the storage block in bytes.
    #[must_use]
    fn storage_len() -> usize {
        Self::layout().size()
    }

    /// The number of live objects in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    /// Whether the pool holds no live objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupancy.len() == 0
    }

    /// Whether every slot holds a live object, in which case allocation will fail.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupancy.is_full()
    }

    /// The fixed number of objects the pool can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The number of bytes of storage reserved per slot. This is `size_of::<T>()`.
    #[must_use]
    pub const fn slot_stride(&self) -> usize {
        size_of::<T>()
    }

    /// Whether the slot with the given index holds a live object.
    ///
    /// Indexes beyond the capacity are reported as not occupied.
    #[must_use]
    pub fn is_slot_occupied(&self, index: usize) -> bool {
        self.occupancy.is_occupied(index)
    }

    /// Whether `ptr` points at a live object in this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// let mut pool = FixedObjectPool::<u32, 2>::new();
    /// let handle = pool.allocate_and_construct(|| 5).unwrap();
    ///
    /// assert!(pool.contains(handle.as_ptr()));
    /// assert!(!pool.contains(std::ptr::null()));
    ///
    /// pool.free(handle.as_ptr());
    /// assert!(!pool.contains(handle.as_ptr()));
    /// ```
    #[must_use]
    pub fn contains(&self, ptr: *const T) -> bool {
        self.occupied_slot_index(ptr).is_ok()
    }

    /// Claims the lowest-indexed vacant slot and constructs an object in it.
    ///
    /// `construct` is called exactly once if a vacant slot exists and not at all if the pool is
    /// full. The object is written directly into pool storage.
    ///
    /// Returns `None` if every slot is occupied. This is an expected outcome: free an object and
    /// try again, or drop the request.
    ///
    /// If `construct` panics, the slot remains vacant.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let mut pool = FixedObjectPool::<Point, 1>::new();
    ///
    /// let point = pool.allocate_and_construct(|| Point { x: 1, y: 2 }).unwrap();
    /// assert_eq!(pool.get(point).map(|p| p.x + p.y), Some(3));
    ///
    /// assert!(pool.allocate_and_construct(|| Point { x: 3, y: 4 }).is_none());
    /// # pool.free(point.as_ptr());
    /// ```
    #[must_use]
    pub fn allocate_and_construct<F>(&mut self, construct: F) -> Option<SlotHandle<T>>
    where
        F: FnOnce() -> T,
    {
        let Some(index) = self.occupancy.first_vacant() else {
            debug!(
                item_type = type_name::<T>(),
                capacity = N,
                "fixed object pool exhausted"
            );
            return None;
        };

        let slot = self.slot_ptr(index);

        // SAFETY: The slot is in bounds and aligned for `T` because the storage is an array
        // layout of `T`. It is vacant, so there is no live object to overwrite.
        unsafe {
            slot.as_ptr().write(construct());
        }

        // Only marked once the object exists, so a panicking constructor leaves it vacant.
        self.occupancy.occupy(index);

        trace!(item_type = type_name::<T>(), index, "slot claimed");

        Some(SlotHandle::new(slot, index))
    }

    /// Same as [`allocate_and_construct()`][1] but reports a full pool as
    /// [`Error::Exhausted`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedObjectPool};
    ///
    /// let mut pool = FixedObjectPool::<u8, 1>::new();
    ///
    /// let first = pool.try_allocate_and_construct(|| 1).unwrap();
    /// assert_eq!(
    ///     pool.try_allocate_and_construct(|| 2),
    ///     Err(Error::Exhausted { capacity: 1 })
    /// );
    /// # pool.free(first.as_ptr());
    /// ```
    ///
    /// [1]: Self::allocate_and_construct
    pub fn try_allocate_and_construct<F>(&mut self, construct: F) -> Result<SlotHandle<T>>
    where
        F: FnOnce() -> T,
    {
        self.allocate_and_construct(construct)
            .ok_or(Error::Exhausted { capacity: N })
    }

    /// Drops the object that `ptr` points to and makes its slot available again.
    ///
    /// Any pointer is accepted. If `ptr` is null, points outside this pool, points into the
    /// middle of a slot or points to a slot that holds no live object, the call does nothing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// let mut pool = FixedObjectPool::<String, 2>::new();
    /// let handle = pool.allocate_and_construct(|| "x".to_string()).unwrap();
    ///
    /// pool.free(handle.as_ptr());
    /// assert!(pool.is_empty());
    ///
    /// // Neither of these has any effect.
    /// pool.free(handle.as_ptr());
    /// pool.free(std::ptr::null());
    /// ```
    pub fn free(&mut self, ptr: *const T) {
        _ = self.try_free(ptr);
    }

    /// Same as [`free()`][1] but reports why a call had no effect.
    ///
    /// The pool state changes only when `Ok(())` is returned.
    ///
    /// # Errors
    ///
    /// * [`Error::Null`] if `ptr` is null.
    /// * [`Error::OutOfRange`] if `ptr` does not point into the storage of this pool.
    /// * [`Error::Misaligned`] if `ptr` points into the storage but not at the start of a slot.
    /// * [`Error::Vacant`] if the slot holds no live object, e.g. because it was already freed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::{Error, FixedObjectPool};
    ///
    /// let mut pool = FixedObjectPool::<u32, 2>::new();
    /// let handle = pool.allocate_and_construct(|| 9).unwrap();
    ///
    /// assert_eq!(pool.try_free(handle.as_ptr()), Ok(()));
    /// assert_eq!(pool.try_free(handle.as_ptr()), Err(Error::Vacant { index: 0 }));
    /// assert_eq!(pool.try_free(std::ptr::null()), Err(Error::Null));
    /// ```
    ///
    /// [1]: Self::free
    pub fn try_free(&mut self, ptr: *const T) -> Result<()> {
        let index = self.occupied_slot_index(ptr)?;

        self.occupancy.vacate(index);

        // SAFETY: The slot was marked occupied, so it holds a live `T`. We cleared the mark
        // above, so nothing will drop it again or hand out a reference to it.
        unsafe {
            self.slot_ptr(index).as_ptr().drop_in_place();
        }

        trace!(item_type = type_name::<T>(), index, "slot released");

        Ok(())
    }

    /// Shared reference to the object a handle points to, or `None` if the handle does not
    /// point to a live object in this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// let mut pool = FixedObjectPool::<u32, 2>::new();
    /// let handle = pool.allocate_and_construct(|| 11).unwrap();
    ///
    /// assert_eq!(pool.get(handle), Some(&11));
    /// # pool.free(handle.as_ptr());
    /// ```
    #[must_use]
    pub fn get(&self, handle: SlotHandle<T>) -> Option<&T> {
        let index = self.occupied_slot_index(handle.as_ptr()).ok()?;

        // SAFETY: The slot is occupied, so it holds a live `T`. The reference borrows the pool,
        // so the object cannot be freed while the reference exists.
        Some(unsafe { self.slot_ptr(index).as_ref() })
    }

    /// Exclusive reference to the object a handle points to, or `None` if the handle does not
    /// point to a live object in this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fixed_pool::FixedObjectPool;
    ///
    /// let mut pool = FixedObjectPool::<String, 2>::new();
    /// let handle = pool.allocate_and_construct(|| "Hello".to_string()).unwrap();
    ///
    /// pool.get_mut(handle).unwrap().push_str(", World!");
    /// assert_eq!(pool.get(handle).map(String::as_str), Some("Hello, World!"));
    /// # pool.free(handle.as_ptr());
    /// ```
    #[must_use]
    pub fn get_mut(&mut self, handle: SlotHandle<T>) -> Option<&mut T> {
        let index = self.occupied_slot_index(handle.as_ptr()).ok()?;

        let mut slot = self.slot_ptr(index);

        // SAFETY: The slot is occupied, so it holds a live `T`. The reference exclusively
        // borrows the pool, so no other reference to the object can be created meanwhile.
        Some(unsafe { slot.as_mut() })
    }

    fn slot_ptr(&self, index: usize) -> NonNull<T> {
        assert!(
            index < N,
            "slot {index} index out of bounds in pool of {}",
            type_name::<T>()
        );

        // SAFETY: Guarded by the bounds check above, so the pointer stays within the block.
        unsafe { self.storage.add(index) }
    }

    /// Maps a pointer to the index of the slot it addresses, without regard to occupancy.
    fn slot_index_of(&self, ptr: *const T) -> Result<usize> {
        if ptr.is_null() {
            return Err(Error::Null);
        }

        // Addresses below the block wrap around to huge offsets, so one comparison rejects
        // pointers on either side of the block.
        let offset = ptr.addr().wrapping_sub(self.storage.as_ptr().addr());

        if offset >= Self::storage_len() {
            return Err(Error::OutOfRange {
                address: ptr.addr(),
            });
        }

        let (index, within_slot) = offset.div_rem(&size_of::<T>());

        if within_slot != 0 {
            return Err(Error::Misaligned { offset });
        }

        Ok(index)
    }

    fn occupied_slot_index(&self, ptr: *const T) -> Result<usize> {
        let index = self.slot_index_of(ptr)?;

        if !self.occupancy.is_occupied(index) {
            return Err(Error::Vacant { index });
        }

        Ok(index)
    }
}

impl<T, const N: usize> Default for FixedObjectPool<T, N> {
    /// Creates a new, empty pool with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero or `T` is zero-sized.
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for FixedObjectPool<T, N> {
    #[cfg_attr(test, mutants::skip)] // Informational output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedObjectPool")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("capacity", &N)
            .field("len", &self.occupancy.len())
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

impl<T, const N: usize> Drop for FixedObjectPool<T, N> {
    fn drop(&mut self) {
        let live = self.occupancy.len();

        if live > 0 {
            debug!(
                item_type = type_name::<T>(),
                live, "dropping fixed object pool with live objects"
            );
        }

        for index in 0..N {
            if !self.occupancy.is_occupied(index) {
                continue;
            }

            self.occupancy.vacate(index);

            // SAFETY: The slot was marked occupied, so it holds a live `T`, and we cleared the
            // mark so it is dropped exactly once.
            unsafe {
                self.slot_ptr(index).as_ptr().drop_in_place();
            }
        }

        // SAFETY: The layout must match between alloc and dealloc. It does.
        unsafe {
            dealloc(self.storage.as_ptr().cast(), Self::layout());
        }

        // Checked after releasing the memory. If we are already panicking, a second panic
        // would only obscure the original one.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                live == 0,
                "dropped a pool of {} holding {live} live objects with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

// SAFETY: The raw storage pointer is owned exclusively by the pool and nothing about it is tied
// to a thread, so the pool can move between threads whenever `T` can.
unsafe impl<T: Send, const N: usize> Send for FixedObjectPool<T, N> {}

/// Tracks which of the `N` slots of a pool currently hold a live object.
///
/// This is the only record of occupancy. The pool never inspects slot memory to decide whether a
/// slot is in use.
#[derive(Debug)]
pub(crate) struct OccupancyMap<const N: usize> {
    occupied: [bool; N],

    /// Number of `true` entries in `occupied`.
    count: usize,
}

impl<const N: usize> OccupancyMap<N> {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            occupied: [false; N],
            count: 0,
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub(crate) fn is_full(&self) -> bool {
        self.count == N
    }

    /// Whether slot `index` is occupied. Out of range indexes are never occupied.
    #[must_use]
    pub(crate) fn is_occupied(&self, index: usize) -> bool {
        self.occupied.get(index).copied().unwrap_or(false)
    }

    /// The lowest-indexed vacant slot, if any.
    #[must_use]
    pub(crate) fn first_vacant(&self) -> Option<usize> {
        self.occupied.iter().position(|occupied| !occupied)
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is already occupied.
    pub(crate) fn occupy(&mut self, index: usize) {
        let flag = self
            .occupied
            .get_mut(index)
            .unwrap_or_else(|| panic!("slot {index} out of bounds in pool of {N}"));

        assert!(!*flag, "slot {index} is already occupied");
        *flag = true;

        self.count = self
            .count
            .checked_add(1)
            .expect("guarded by the slot having been vacant, so count < N");
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds or the slot is not occupied.
    pub(crate) fn vacate(&mut self, index: usize) {
        let flag = self
            .occupied
            .get_mut(index)
            .unwrap_or_else(|| panic!("slot {index} out of bounds in pool of {N}"));

        assert!(*flag, "slot {index} is not occupied");
        *flag = false;

        self.count = self
            .count
            .checked_sub(1)
            .expect("guarded by the slot having been occupied, so count > 0");
    }
}

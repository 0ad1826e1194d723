use thiserror::Error;

/// Reasons a pool operation did not take effect.
///
/// [`FixedObjectPool::free()`][1] absorbs all of these silently. The `try_` variants of the pool
/// operations report them for callers that want to detect misuse.
///
/// [1]: crate::FixedObjectPool::free
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Every slot in the pool is occupied.
    #[error("all {capacity} slots of the pool are occupied")]
    Exhausted {
        /// The fixed capacity of the pool.
        capacity: usize,
    },

    /// The pointer was null.
    #[error("cannot free a null pointer")]
    Null,

    /// The pointer does not point into the storage of this pool.
    #[error("address {address:#x} is outside the storage of the pool")]
    OutOfRange {
        /// The address that was rejected.
        address: usize,
    },

    /// The pointer points into the storage of this pool but not at the start of a slot.
    #[error("byte offset {offset} into the pool storage is not at the start of a slot")]
    Misaligned {
        /// Byte offset of the pointer from the start of the pool storage.
        offset: usize,
    },

    /// The pointer addresses a slot that holds no live object.
    #[error("slot {index} does not hold a live object")]
    Vacant {
        /// Index of the slot that was addressed.
        index: usize,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug, Copy);

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            Error::Exhausted { capacity: 2 }.to_string(),
            "all 2 slots of the pool are occupied"
        );
        assert_eq!(
            Error::OutOfRange { address: 0x10 }.to_string(),
            "address 0x10 is outside the storage of the pool"
        );
        assert_eq!(
            Error::Misaligned { offset: 3 }.to_string(),
            "byte offset 3 into the pool storage is not at the start of a slot"
        );
        assert_eq!(
            Error::Vacant { index: 1 }.to_string(),
            "slot 1 does not hold a live object"
        );
    }
}

use thiserror::Error;

/// Convenient result alias for fallible tree operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`BTree`](crate::BTree) operations.
///
/// A failed operation leaves the tree exactly as it was; validation happens
/// before any mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// An absent (`None`) key was passed to `insert`, `remove`, or `search`.
    #[error("attempted to use an absent key")]
    InvalidKey,

    /// `remove` was called with a key that is not in the tree.
    #[error("attempted to remove a key that is not in the tree")]
    KeyNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(Error::InvalidKey.to_string(), "attempted to use an absent key");
        assert_eq!(Error::KeyNotFound.to_string(), "attempted to remove a key that is not in the tree");
    }
}

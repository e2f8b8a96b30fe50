use thiserror::Error;

/// Errors reported by fallible tree operations.
///
/// Every check happens before the tree is modified, so a call that fails leaves the tree as it
/// was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A position lies outside the valid range for the current length.
    ///
    /// For substrings, `pos` is the exclusive end of the requested range.
    #[error("position {pos} is out of range for a sequence of length {len}")]
    OutOfRange { pos: usize, len: usize },

    /// A tree was concatenated onto itself.
    #[error("cannot concatenate a tree with itself")]
    SelfConcatenation,
}

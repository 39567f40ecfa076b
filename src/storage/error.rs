use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::storage::Key;

/// The result type for requests processed by the storage and the request handler.
pub type Result<T> = std::result::Result<T, KvErr>;

/// Error returned by an `Optimizer` whenever the gradient and the parameters it
/// has to update don't have the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatchErr {
    pub expected: usize,
    pub got: usize,
}

impl Display for SizeMismatchErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size mismatch: expected {} values, got {}",
            self.expected, self.got
        )
    }
}

impl Error for SizeMismatchErr {}

/// The reasons a single request can be rejected.
///
/// A rejected request never mutates the state of its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvErr {
    /// The amount of pushed values doesn't match the dimension of the entry.
    SizeMismatch {
        key: Key,
        expected: usize,
        got: usize,
    },
    /// A pull was issued for a key that was never pushed.
    Uninitialized { key: Key },
    /// The initial push of a key carried no values.
    EmptyPush { key: Key },
}

impl KvErr {
    /// Attaches the key of the failed request to an optimizer error.
    pub fn size_mismatch(key: Key, err: SizeMismatchErr) -> Self {
        let SizeMismatchErr { expected, got } = err;
        Self::SizeMismatch { key, expected, got }
    }

    /// The key of the rejected request.
    pub fn key(&self) -> Key {
        match *self {
            Self::SizeMismatch { key, .. } | Self::Uninitialized { key } | Self::EmptyPush { key } => {
                key
            }
        }
    }
}

impl Display for KvErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { key, expected, got } => write!(
                f,
                "size mismatch for key {key}: expected {expected} values, got {got}"
            ),
            Self::Uninitialized { key } => write!(f, "key {key} must be initialized first"),
            Self::EmptyPush { key } => write!(f, "cannot initialize key {key} with no values"),
        }
    }
}

impl Error for KvErr {}

/// Boundary conversion for binaries / I/O APIs.
impl From<KvErr> for io::Error {
    fn from(value: KvErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}

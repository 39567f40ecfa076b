use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type for building servers.
pub type Result<T> = std::result::Result<T, SpecErr>;

/// Error returned by the `ServerBuilder` whenever a `ServerSpec` holds values the
/// server can't be built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecErr(String);

impl SpecErr {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl Display for SpecErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid server spec: {}", self.0)
    }
}

impl Error for SpecErr {}

impl From<SpecErr> for io::Error {
    fn from(value: SpecErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}

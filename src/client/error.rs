use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::{message::Response, storage::KvErr};

/// The client module's result type.
pub type Result<T> = std::result::Result<T, ClientErr>;

/// Client side failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientErr {
    /// The server dropped the request without ever replying.
    Disconnected,
    /// The server rejected the request.
    Rejected(KvErr),
    /// The server replied with a response of the wrong kind.
    Unexpected(Response),
}

impl Display for ClientErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("the server dropped the request"),
            Self::Rejected(e) => write!(f, "request rejected: {e}"),
            Self::Unexpected(res) => write!(f, "unexpected response: {res:?}"),
        }
    }
}

impl Error for ClientErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KvErr> for ClientErr {
    fn from(value: KvErr) -> Self {
        Self::Rejected(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ClientErr> for io::Error {
    fn from(value: ClientErr) -> Self {
        match value {
            ClientErr::Disconnected => io::Error::new(io::ErrorKind::BrokenPipe, value),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

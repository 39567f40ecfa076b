use crate::storage::{Key, KvErr, Result};

/// The operation requested on a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Contributes values for a key, the initial parameters if the key is new or a gradient otherwise.
    Push(Vec<f32>),
    /// Reads the current parameters of a key.
    Pull,
}

impl Op {
    pub fn is_push(&self) -> bool {
        matches!(self, Op::Push(_))
    }
}

/// An inbound request, `requester` is an opaque token used to address the replies.
#[derive(Debug, Clone)]
pub struct Request<T> {
    pub key: Key,
    pub op: Op,
    pub requester: T,
}

impl<T> Request<T> {
    pub fn push(key: Key, values: Vec<f32>, requester: T) -> Self {
        Self {
            key,
            op: Op::Push(values),
            requester,
        }
    }

    pub fn pull(key: Key, requester: T) -> Self {
        Self {
            key,
            op: Op::Pull,
            requester,
        }
    }
}

/// The successful outcome of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Acknowledges a push.
    Ack { key: Key },
    /// The parameters of a key, one value per dimension.
    Values { key: Key, values: Vec<f32> },
}

/// A response addressed to a single requester.
#[derive(Debug)]
pub struct Reply<T> {
    pub to: T,
    pub res: Result<Response>,
}

impl<T> Reply<T> {
    pub fn ack(to: T, key: Key) -> Self {
        Self {
            to,
            res: Ok(Response::Ack { key }),
        }
    }

    pub fn values(to: T, key: Key, values: Vec<f32>) -> Self {
        Self {
            to,
            res: Ok(Response::Values { key, values }),
        }
    }

    pub fn err(to: T, err: KvErr) -> Self {
        Self { to, res: Err(err) }
    }
}

use log::debug;
use tokio::sync::oneshot;

use super::{ClientErr, KvClient, Result};
use crate::{
    message::{Op, Reply, Request, Response},
    service::ServerHandle,
    storage::{self, Key},
};

/// The requester token of a `LocalClient`, the reply of a request is sent through it.
pub type Token = oneshot::Sender<storage::Result<Response>>;

/// A client calling a handler living in the same process.
///
/// After each request it delivers every reply the handler produced, so the push
/// completing a synchronous round also wakes up the other workers of that round.
#[derive(Clone)]
pub struct LocalClient {
    handle: ServerHandle<Token>,
}

impl LocalClient {
    /// Creates a new `LocalClient`.
    ///
    /// # Arguments
    /// * `handle` - The handle of the server to send the requests to.
    pub fn new(handle: ServerHandle<Token>) -> Self {
        Self { handle }
    }

    /// Sends a request and waits for it's reply.
    async fn request(&self, key: Key, op: Op) -> Result<Response> {
        let (tx, rx) = oneshot::channel();
        let replies = self.handle.handle(Request { key, op, requester: tx }).await;
        Self::deliver(replies);

        let res = rx.await.map_err(|_| ClientErr::Disconnected)?;
        Ok(res?)
    }

    fn deliver(replies: Vec<Reply<Token>>) {
        for Reply { to, res } in replies {
            if to.send(res).is_err() {
                debug!("requester went away before it's reply");
            }
        }
    }
}

impl KvClient for LocalClient {
    async fn push(&self, key: Key, values: Vec<f32>) -> Result<()> {
        match self.request(key, Op::Push(values)).await? {
            Response::Ack { .. } => Ok(()),
            res => Err(ClientErr::Unexpected(res)),
        }
    }

    async fn pull(&self, key: Key) -> Result<Vec<f32>> {
        match self.request(key, Op::Pull).await? {
            Response::Values { values, .. } => Ok(values),
            res => Err(ClientErr::Unexpected(res)),
        }
    }
}

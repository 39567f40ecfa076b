use std::{ops::Deref, sync::Arc};

use tokio::task;

use super::Handler;
use crate::message::{Reply, Request};

/// The async interface to interact with a `Handler`.
///
/// It bridges the async runtime with the blocking CPU-bound implementation of the handler,
/// it must be used from a multi threaded runtime.
pub struct ServerHandle<T>(Arc<dyn Handler<T>>);

impl<T> Clone for ServerHandle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for ServerHandle<T> {
    type Target = dyn Handler<T>;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<T> ServerHandle<T> {
    /// Creates a new `ServerHandle`.
    ///
    /// # Arguments
    /// * `handler` - The underlying request handler.
    ///
    /// # Returns
    /// A new `ServerHandle` instance.
    pub fn new(handler: Box<dyn Handler<T>>) -> Self {
        Self(Arc::from(handler))
    }

    /// Async call to the synchronous implementation of `Handler::handle`.
    pub async fn handle(&self, req: Request<T>) -> Vec<Reply<T>> {
        task::block_in_place(|| self.0.handle(req))
    }

    /// Async call to the synchronous implementation of `Handler::handle_batch`.
    pub async fn handle_batch(&self, reqs: Vec<Request<T>>) -> Vec<Reply<T>> {
        task::block_in_place(|| self.0.handle_batch(reqs))
    }
}

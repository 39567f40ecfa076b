use crate::message::{Reply, Request};

/// This trait acts as an indirection layer, allowing the `ServerBuilder` to return
/// different `KvServer` configurations from it's unique build method.
pub trait Handler<T>: Send + Sync {
    /// Processes a single request.
    ///
    /// # Returns
    /// Every reply the request produced, each one addressed to its requester.
    fn handle(&self, req: Request<T>) -> Vec<Reply<T>>;

    /// Processes many requests, requests on the same key are processed in the given order.
    ///
    /// # Returns
    /// Every reply the requests produced, grouped by shard.
    fn handle_batch(&self, reqs: Vec<Request<T>>) -> Vec<Reply<T>>;
}

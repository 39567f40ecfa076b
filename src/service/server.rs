use log::{debug, warn};
use rayon::prelude::*;

use super::Handler;
use crate::{
    message::{Op, Reply, Request},
    optimization::Optimizer,
    storage::{Key, KvErr, KvStore, Shard},
    synchronization::Synchronizer,
};

/// The request handler, routes every request of a key through its entry, its merge
/// buffer and the update rule and decides which requesters get a reply.
///
/// A push on a key without an entry seeds it verbatim, later pushes go through the
/// `Synchronizer` and pulls read the current parameters.
pub struct KvServer<O: Optimizer, S, F, T> {
    store: KvStore<O, T>,
    synchronizer: S,
    optimizer_factory: F,
}

impl<O, S, F, T> KvServer<O, S, F, T>
where
    O: Optimizer,
    S: Synchronizer,
    F: Fn(usize) -> O,
{
    /// Creates a new `KvServer`.
    ///
    /// # Arguments
    /// * `store` - The storage of the entries.
    /// * `synchronizer` - The synchronization strategy for gradient pushes.
    /// * `optimizer_factory` - Creates the optimizer of every new entry given it's length.
    ///
    /// # Returns
    /// A new `KvServer` instance.
    pub fn new(store: KvStore<O, T>, synchronizer: S, optimizer_factory: F) -> Self {
        Self {
            store,
            synchronizer,
            optimizer_factory,
        }
    }

    /// Processes a single request while holding the lock of it's key's shard.
    pub fn handle(&self, req: Request<T>) -> Vec<Reply<T>> {
        let mut shard = self.store.lock(req.key);
        self.process(&mut shard, req)
    }

    /// Routes a request to it's transition.
    fn process(&self, shard: &mut Shard<O, T>, req: Request<T>) -> Vec<Reply<T>> {
        let Request { key, op, requester } = req;

        match op {
            Op::Push(values) if !shard.contains(key) => self.init(shard, key, values, requester),
            Op::Push(grad) => self.synchronizer.push(shard, key, grad, requester),
            Op::Pull => Self::pull(shard, key, requester),
        }
    }

    /// Seeds the entry of `key` with `params`, the update rule isn't applied.
    fn init(&self, shard: &mut Shard<O, T>, key: Key, params: Vec<f32>, requester: T) -> Vec<Reply<T>> {
        if params.is_empty() {
            warn!(key = key; "rejected empty initial push");
            return vec![Reply::err(requester, KvErr::EmptyPush { key })];
        }

        let len = params.len();
        shard.get_or_create(key, params, &self.optimizer_factory);
        debug!(key = key, len = len; "initialized key");

        vec![Reply::ack(requester, key)]
    }

    fn pull(shard: &Shard<O, T>, key: Key, requester: T) -> Vec<Reply<T>> {
        match shard.entry(key) {
            Some(entry) => vec![Reply::values(requester, key, entry.params().to_vec())],
            None => {
                warn!(key = key; "rejected pull on uninitialized key");
                vec![Reply::err(requester, KvErr::Uninitialized { key })]
            }
        }
    }
}

impl<O, S, F, T> KvServer<O, S, F, T>
where
    O: Optimizer,
    S: Synchronizer,
    F: Fn(usize) -> O + Sync,
    T: Send,
{
    /// Processes many requests, the shards are processed in parallel.
    ///
    /// Requests are bucketed by shard keeping their relative order, every bucket locks
    /// it's shard once and processes it's requests sequentially.
    pub fn handle_batch(&self, reqs: Vec<Request<T>>) -> Vec<Reply<T>> {
        let mut buckets: Vec<Vec<Request<T>>> = (0..self.store.shards()).map(|_| Vec::new()).collect();

        for req in reqs {
            buckets[self.store.shard_idx(req.key)].push(req);
        }

        buckets
            .into_par_iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .flat_map_iter(|(idx, bucket)| {
                let mut shard = self.store.lock_idx(idx);

                bucket
                    .into_iter()
                    .flat_map(|req| self.process(&mut shard, req))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl<O, S, F, T> Handler<T> for KvServer<O, S, F, T>
where
    O: Optimizer,
    S: Synchronizer,
    F: Fn(usize) -> O + Send + Sync,
    T: Send,
{
    /// Indirection call to `Self::handle`.
    fn handle(&self, req: Request<T>) -> Vec<Reply<T>> {
        self.handle(req)
    }

    /// Indirection call to `Self::handle_batch`.
    fn handle_batch(&self, reqs: Vec<Request<T>>) -> Vec<Reply<T>> {
        self.handle_batch(reqs)
    }
}

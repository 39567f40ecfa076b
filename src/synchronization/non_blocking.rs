use log::warn;

use super::Synchronizer;
use crate::{
    message::Reply,
    optimization::Optimizer,
    storage::{Key, KvErr, Shard},
};

/// Skips synchronization between workers, every push updates the entry immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlockingSync;

impl NoBlockingSync {
    /// Creates a new `NoBlockingSync` synchronizer.
    pub fn new() -> Self {
        Self
    }
}

impl Synchronizer for NoBlockingSync {
    fn push<O, T>(&self, shard: &mut Shard<O, T>, key: Key, grad: Vec<f32>, requester: T) -> Vec<Reply<T>>
    where
        O: Optimizer,
    {
        let Some(entry) = shard.entry_mut(key) else {
            return vec![Reply::err(requester, KvErr::Uninitialized { key })];
        };

        match entry.update(&grad) {
            Ok(()) => vec![Reply::ack(requester, key)],
            Err(e) => {
                warn!(key = key; "rejected push: {e}");
                vec![Reply::err(requester, KvErr::size_mismatch(key, e))]
            }
        }
    }
}

use std::num::NonZeroUsize;

use parking_lot::{Mutex, MutexGuard};

use crate::{
    optimization::Optimizer,
    storage::{Key, Shard},
};

/// Partitions the key space in shards, each one behind its own lock.
///
/// Every request locks the shard of its key for its whole duration, so requests on the
/// same key are serialized while requests on keys of other shards proceed in parallel.
#[derive(Debug)]
pub struct KvStore<O: Optimizer, T> {
    shards: Box<[Mutex<Shard<O, T>>]>,
}

impl<O: Optimizer, T> KvStore<O, T> {
    /// Creates a new `KvStore`.
    ///
    /// # Arguments
    /// * `shards` - The amount of shards to partition the keys in.
    ///
    /// # Returns
    /// A new empty `KvStore` instance.
    pub fn new(shards: NonZeroUsize) -> Self {
        let shards = (0..shards.get())
            .map(|_| Mutex::new(Shard::new()))
            .collect();

        Self { shards }
    }

    /// Returns the amount of shards.
    pub fn shards(&self) -> usize {
        self.shards.len()
    }

    /// Returns the index of the shard owning `key`.
    pub fn shard_idx(&self, key: Key) -> usize {
        (key % self.shards.len() as u64) as usize
    }

    /// Locks the shard owning `key`.
    pub fn lock(&self, key: Key) -> MutexGuard<'_, Shard<O, T>> {
        self.lock_idx(self.shard_idx(key))
    }

    /// Locks the shard at `idx`, must be lower than `self.shards()`.
    pub fn lock_idx(&self, idx: usize) -> MutexGuard<'_, Shard<O, T>> {
        self.shards[idx].lock()
    }
}

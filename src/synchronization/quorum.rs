use std::num::NonZeroUsize;

use log::{debug, trace, warn};

use super::{Aggregation, Synchronizer};
use crate::{
    message::Reply,
    optimization::Optimizer,
    storage::{Key, KvErr, Shard, SizeMismatchErr},
};

/// Holds back the pushes of a key until `quorum` of them arrived, then updates the
/// entry once with their aggregate and acknowledges every one of them.
///
/// A missing contributor stalls the round of that key indefinitely.
#[derive(Debug, Clone, Copy)]
pub struct QuorumSync {
    quorum: NonZeroUsize,
    aggregation: Aggregation,
}

impl QuorumSync {
    /// Creates a new `QuorumSync` synchronizer.
    ///
    /// # Arguments
    /// * `quorum` - The amount of pushes a round waits for, usually the amount of workers.
    /// * `aggregation` - How the pushes of a round are combined.
    ///
    /// # Returns
    /// A new `QuorumSync` instance.
    pub fn new(quorum: NonZeroUsize, aggregation: Aggregation) -> Self {
        Self { quorum, aggregation }
    }

    pub fn quorum(&self) -> usize {
        self.quorum.get()
    }

    fn reject<T>(key: Key, requester: T, err: SizeMismatchErr) -> Vec<Reply<T>> {
        warn!(key = key; "rejected push: {err}");
        vec![Reply::err(requester, KvErr::size_mismatch(key, err))]
    }
}

impl Synchronizer for QuorumSync {
    fn push<O, T>(&self, shard: &mut Shard<O, T>, key: Key, grad: Vec<f32>, requester: T) -> Vec<Reply<T>>
    where
        O: Optimizer,
    {
        let Some((entry, merged)) = shard.entry_and_merge(key) else {
            return vec![Reply::err(requester, KvErr::Uninitialized { key })];
        };

        if let Err(e) = entry.check_len(grad.len()) {
            return Self::reject(key, requester, e);
        }

        if let Err((e, requester)) = merged.accumulate(&grad, requester) {
            return Self::reject(key, requester, e);
        }

        trace!(key = key, pending = merged.pending(); "accumulated gradient");

        if merged.pending() < self.quorum.get() {
            return Vec::new();
        }

        merged.aggregate(self.aggregation);
        let res = entry.update(merged.grads());
        let pending = merged.clear();

        debug!(key = key, contributors = pending.len(); "flushed merge buffer");

        match res {
            Ok(()) => pending.into_iter().map(|to| Reply::ack(to, key)).collect(),
            Err(e) => pending
                .into_iter()
                .map(|to| Reply::err(to, KvErr::size_mismatch(key, e)))
                .collect(),
        }
    }
}

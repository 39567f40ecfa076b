use crate::{
    message::Reply,
    optimization::Optimizer,
    storage::{Key, Shard},
};

/// Decides how a gradient push on an initialized key reaches its entry.
///
/// The caller holds the lock of `shard` for the whole call, everything a `Synchronizer`
/// does to the key is observed atomically by other requests.
pub trait Synchronizer: Send + Sync {
    /// Processes a gradient push on `key`.
    ///
    /// # Arguments
    /// * `shard` - The locked shard owning `key`.
    /// * `key` - The key of the push.
    /// * `grad` - The pushed gradient.
    /// * `requester` - The token of the requester of this push.
    ///
    /// # Returns
    /// The replies to deliver, possibly none or addressed to other requesters.
    fn push<O, T>(&self, shard: &mut Shard<O, T>, key: Key, grad: Vec<f32>, requester: T) -> Vec<Reply<T>>
    where
        O: Optimizer;
}

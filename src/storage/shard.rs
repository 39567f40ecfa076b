use std::collections::HashMap;

use crate::{
    optimization::Optimizer,
    storage::{Entry, Key},
    synchronization::MergeBuffer,
};

/// A partition of the key space, holds the entries and merge buffers of its keys.
///
/// A `Shard` isn't synchronized on its own, the `KvStore` keeps each one behind a lock.
#[derive(Debug)]
pub struct Shard<O: Optimizer, T> {
    entries: HashMap<Key, Entry<O>>,
    merges: HashMap<Key, MergeBuffer<T>>,
}

impl<O: Optimizer, T> Default for Shard<O, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Optimizer, T> Shard<O, T> {
    /// Creates a new empty `Shard`.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            merges: HashMap::new(),
        }
    }

    /// Returns `true` if `key` has already been initialized.
    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns the entry for `key`, creating it from `params` if it doesn't exist yet.
    ///
    /// # Arguments
    /// * `key` - The key of the entry.
    /// * `params` - The initial parameters, only used if the entry is created.
    /// * `optimizer_factory` - Creates the optimizer for an entry of the given length.
    pub fn get_or_create<F>(&mut self, key: Key, params: Vec<f32>, optimizer_factory: F) -> &mut Entry<O>
    where
        F: FnOnce(usize) -> O,
    {
        self.entries.entry(key).or_insert_with(|| {
            let optimizer = optimizer_factory(params.len());
            Entry::new(params, optimizer)
        })
    }

    pub fn entry(&self, key: Key) -> Option<&Entry<O>> {
        self.entries.get(&key)
    }

    pub fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<O>> {
        self.entries.get_mut(&key)
    }

    /// Returns the entry of `key` together with its merge buffer, the buffer is created on first use.
    ///
    /// # Returns
    /// `None` if `key` hasn't been initialized, no buffer is created in that case.
    pub fn entry_and_merge(&mut self, key: Key) -> Option<(&mut Entry<O>, &mut MergeBuffer<T>)> {
        let entry = self.entries.get_mut(&key)?;
        let merged = self.merges.entry(key).or_default();
        Some((entry, merged))
    }

    pub fn merge(&self, key: Key) -> Option<&MergeBuffer<T>> {
        self.merges.get(&key)
    }
}

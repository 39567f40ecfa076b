mod entry;
mod error;
mod shard;
mod store;

pub use entry::Entry;
pub use error::{KvErr, Result, SizeMismatchErr};
pub use shard::Shard;
pub use store::KvStore;

/// The opaque identifier of a parameter vector.
pub type Key = u64;

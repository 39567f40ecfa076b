mod merge_buffer;
mod non_blocking;
mod quorum;
mod synchronizer;

pub use merge_buffer::{Aggregation, MergeBuffer};
pub use non_blocking::NoBlockingSync;
pub use quorum::QuorumSync;
pub use synchronizer::Synchronizer;

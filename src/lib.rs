pub mod client;
pub mod message;
pub mod optimization;
pub mod service;
pub mod storage;
pub mod synchronization;


pub use client::{KvClient, LocalClient};
pub use message::{Op, Reply, Request, Response};
pub use service::{Handler, ServerBuilder, ServerHandle, ServerSpec};
pub use storage::{Key, KvErr};

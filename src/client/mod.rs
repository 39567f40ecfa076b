mod error;
mod kv_client;
mod local;

pub use error::{ClientErr, Result};
pub use kv_client::KvClient;
pub use local::{LocalClient, Token};

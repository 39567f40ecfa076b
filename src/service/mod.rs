mod builder;
mod error;
mod handle;
mod handler;
mod server;
mod specs;

pub use builder::ServerBuilder;
pub use error::{Result, SpecErr};
pub use handle::ServerHandle;
pub use handler::Handler;
pub use server::KvServer;
pub use specs::{AggregationSpec, ModeSpec, OptimizerSpec, ServerSpec};

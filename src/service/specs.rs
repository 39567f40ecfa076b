use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::synchronization::Aggregation;

const DEFAULT_SHARDS: NonZeroUsize = NonZeroUsize::new(16).unwrap();

/// The specification for the `Synchronizer` of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSpec {
    Sync,
    Async,
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Ftrl {
        alpha: f32,
        beta: f32,
        lambda1: f32,
        lambda2: f32,
    },
    PlainSum,
}

/// The specification for the `Aggregation` of synchronous rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationSpec {
    Mean,
    Sum,
}

impl From<AggregationSpec> for Aggregation {
    fn from(value: AggregationSpec) -> Self {
        match value {
            AggregationSpec::Mean => Aggregation::Mean,
            AggregationSpec::Sum => Aggregation::Sum,
        }
    }
}

/// The specification for the `Handler` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub mode: ModeSpec,
    pub workers: NonZeroUsize,
    pub optimizer: OptimizerSpec,
    #[serde(default = "default_shards")]
    pub shards: NonZeroUsize,
    #[serde(default)]
    pub aggregation: Option<AggregationSpec>,
}

impl ServerSpec {
    /// Creates a new `ServerSpec` with the default amount of shards and the
    /// default aggregation of `optimizer`.
    pub fn new(mode: ModeSpec, workers: NonZeroUsize, optimizer: OptimizerSpec) -> Self {
        Self {
            mode,
            workers,
            optimizer,
            shards: DEFAULT_SHARDS,
            aggregation: None,
        }
    }
}

fn default_shards() -> NonZeroUsize {
    DEFAULT_SHARDS
}

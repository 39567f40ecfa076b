use std::num::NonZeroUsize;

use super::{Handler, KvServer, ModeSpec, OptimizerSpec, Result, ServerSpec, SpecErr};
use crate::{
    optimization::{Ftrl, FtrlConfig, Optimizer, PlainSum},
    storage::KvStore,
    synchronization::{Aggregation, NoBlockingSync, QuorumSync, Synchronizer},
};

/// Builds `Handler`s given a specification.
#[derive(Debug, Default)]
pub struct ServerBuilder;

impl ServerBuilder {
    /// Creates a new `ServerBuilder`.
    ///
    /// # Returns
    /// A new `ServerBuilder` instance.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Handler` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification of the server.
    ///
    /// # Returns
    /// A new handler or a `SpecErr` if the specification has invalid hyperparameters.
    pub fn build<T>(&self, spec: ServerSpec) -> Result<Box<dyn Handler<T>>>
    where
        T: Send + 'static,
    {
        self.resolve_optimizer(spec)
    }

    /// Resolves the `Optimizer` for this server.
    ///
    /// FTRL rounds default to the mean of the contributions and plain sum rounds to their sum.
    ///
    /// # Arguments
    /// * `spec` - The specification of the server.
    ///
    /// # Returns
    /// A new handler or a `SpecErr` if the specification has invalid hyperparameters.
    fn resolve_optimizer<T>(&self, spec: ServerSpec) -> Result<Box<dyn Handler<T>>>
    where
        T: Send + 'static,
    {
        match spec.optimizer {
            OptimizerSpec::Ftrl {
                alpha,
                beta,
                lambda1,
                lambda2,
            } => {
                let config = FtrlConfig {
                    alpha,
                    beta,
                    lambda1,
                    lambda2,
                };
                Self::validate_ftrl(&config)?;

                let factory = move |len| Ftrl::new(len, config);
                Ok(self.resolve_synchronizer(&spec, Aggregation::Mean, factory))
            }
            OptimizerSpec::PlainSum => {
                let factory = |_| PlainSum::new();
                Ok(self.resolve_synchronizer(&spec, Aggregation::Sum, factory))
            }
        }
    }

    /// Checks every FTRL hyperparameter is a finite positive number.
    fn validate_ftrl(config: &FtrlConfig) -> Result<()> {
        let FtrlConfig {
            alpha,
            beta,
            lambda1,
            lambda2,
        } = *config;

        for (name, value) in [
            ("alpha", alpha),
            ("beta", beta),
            ("lambda1", lambda1),
            ("lambda2", lambda2),
        ] {
            if !value.is_finite() || value <= 0. {
                return Err(SpecErr::new(format!(
                    "ftrl {name} must be a finite positive number, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Resolves the `Synchronizer` for this server.
    ///
    /// # Arguments
    /// * `spec` - The specification of the server.
    /// * `aggregation` - The aggregation to use if the spec doesn't override it.
    /// * `optimizer_factory` - A factory of optimizers.
    ///
    /// # Returns
    /// A new handler.
    fn resolve_synchronizer<T, O, OF>(
        &self,
        spec: &ServerSpec,
        aggregation: Aggregation,
        optimizer_factory: OF,
    ) -> Box<dyn Handler<T>>
    where
        T: Send + 'static,
        O: Optimizer + 'static,
        OF: Fn(usize) -> O + Send + Sync + 'static,
    {
        match spec.mode {
            ModeSpec::Sync => {
                let aggregation = spec.aggregation.map(Into::into).unwrap_or(aggregation);
                let synchronizer = QuorumSync::new(spec.workers, aggregation);
                self.terminate_build(spec.shards, synchronizer, optimizer_factory)
            }
            ModeSpec::Async => {
                let synchronizer = NoBlockingSync::new();
                self.terminate_build(spec.shards, synchronizer, optimizer_factory)
            }
        }
    }

    /// Terminates the entire build and finally instanciates all the entities.
    ///
    /// # Arguments
    /// * `shards` - The amount of shards of the store.
    /// * `synchronizer` - A resolved synchronizer.
    /// * `optimizer_factory` - A factory of optimizers.
    ///
    /// # Returns
    /// A new handler.
    fn terminate_build<T, O, OF, S>(
        &self,
        shards: NonZeroUsize,
        synchronizer: S,
        optimizer_factory: OF,
    ) -> Box<dyn Handler<T>>
    where
        T: Send + 'static,
        O: Optimizer + 'static,
        OF: Fn(usize) -> O + Send + Sync + 'static,
        S: Synchronizer + 'static,
    {
        let store = KvStore::new(shards);
        let server = KvServer::new(store, synchronizer, optimizer_factory);
        Box::new(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        message::{Request, Response},
        service::AggregationSpec,
    };

    fn spec(mode: ModeSpec, optimizer: OptimizerSpec) -> ServerSpec {
        ServerSpec {
            mode,
            workers: NonZeroUsize::new(2).unwrap(),
            optimizer,
            shards: NonZeroUsize::new(4).unwrap(),
            aggregation: None,
        }
    }

    fn ftrl_spec(lambda1: f32) -> OptimizerSpec {
        OptimizerSpec::Ftrl {
            alpha: 0.1,
            beta: 1.,
            lambda1,
            lambda2: 0.0005,
        }
    }

    fn pull(handler: &dyn Handler<u8>, key: u64) -> Vec<f32> {
        match handler.handle(Request::pull(key, 0)).remove(0).res {
            Ok(Response::Values { values, .. }) => values,
            res => panic!("unexpected pull result {res:?}"),
        }
    }

    fn sync_round(spec: ServerSpec) -> Vec<f32> {
        let handler = ServerBuilder::new().build::<u8>(spec).unwrap();
        handler.handle(Request::push(3, vec![0.], 0));
        handler.handle(Request::push(3, vec![4.], 1));
        handler.handle(Request::push(3, vec![6.], 2));
        pull(handler.as_ref(), 3)
    }

    #[test]
    fn plain_sum_sync_sums() {
        let values = sync_round(spec(ModeSpec::Sync, OptimizerSpec::PlainSum));
        assert_eq!(values, [10.]);
    }

    #[test]
    fn aggregation_override() {
        let mut spec = spec(ModeSpec::Sync, OptimizerSpec::PlainSum);
        spec.aggregation = Some(AggregationSpec::Mean);

        assert_eq!(sync_round(spec), [5.]);
    }

    #[test]
    fn ftrl_sync_uses_mean() {
        let values = sync_round(spec(ModeSpec::Sync, ftrl_spec(0.01)));

        let mut expected = [0.];
        Ftrl::new(1, FtrlConfig::default())
            .update_params(&[5.], &mut expected)
            .unwrap();
        assert_eq!(values, expected);
    }

    #[test]
    fn async_applies_each_push() {
        let handler = ServerBuilder::new()
            .build::<u8>(spec(ModeSpec::Async, OptimizerSpec::PlainSum))
            .unwrap();

        handler.handle(Request::push(1, vec![1.], 0));
        handler.handle(Request::push(1, vec![2.], 0));
        assert_eq!(pull(handler.as_ref(), 1), [3.]);
    }

    #[test]
    fn invalid_hyperparameters() {
        for lambda1 in [0., -1., f32::NAN, f32::INFINITY] {
            let res = ServerBuilder::new().build::<u8>(spec(ModeSpec::Sync, ftrl_spec(lambda1)));
            assert!(res.is_err(), "lambda1 = {lambda1} should be rejected");
        }
    }
}

use rayon::prelude::*;

use super::Optimizer;
use crate::storage::SizeMismatchErr;

/// Keys with at least this many dimensions are updated in parallel.
const PAR_THRESHOLD: usize = 4096;

/// The hyperparameters of the FTRL-proximal update rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FtrlConfig {
    pub alpha: f32,
    pub beta: f32,
    pub lambda1: f32,
    pub lambda2: f32,
}

impl Default for FtrlConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 1.,
            lambda1: 0.01,
            lambda2: 0.0005,
        }
    }
}

/// The per dimension accumulators, `g` holds the accumulated gradient and
/// `n` the accumulated squared gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accum {
    g: f32,
    n: f32,
}

/// Follow The Regularized Leader, proximal variant.
///
/// Combines the accumulated gradient and squared gradient of every dimension with L1 and L2
/// regularization, weights whose accumulated gradient stays under `lambda1` are clamped to zero.
#[derive(Debug, Clone)]
pub struct Ftrl {
    config: FtrlConfig,
    accums: Box<[Accum]>,
}

impl Ftrl {
    /// Creates a new `Ftrl` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `config` - The hyperparameters of the update rule.
    ///
    /// # Returns
    /// A new `Ftrl` instance with zeroed accumulators.
    pub fn new(len: usize, config: FtrlConfig) -> Self {
        Self {
            config,
            accums: vec![Accum::default(); len].into_boxed_slice(),
        }
    }

    /// Returns the `(g, n)` accumulators of every dimension.
    pub fn accumulators(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.accums.iter().map(|acc| (acc.g, acc.n))
    }

    /// Updates a single dimension.
    ///
    /// `g` and `n` are updated with the previous weight, the weight is recomputed
    /// last from the new accumulators.
    fn step(config: &FtrlConfig, acc: &mut Accum, w: &mut f32, grad: f32) {
        let FtrlConfig {
            alpha,
            beta,
            lambda1,
            lambda2,
        } = *config;

        let sigma = (acc.n + acc.g * acc.g).sqrt() - acc.n.sqrt();
        acc.g += grad - *w / alpha * sigma;
        acc.n += acc.g * acc.g;

        *w = if acc.g.abs() < lambda1 {
            0.
        } else {
            (acc.g.signum() * lambda1 - acc.g) / ((beta + acc.n.sqrt()) / alpha + lambda2)
        };
    }
}

impl Optimizer for Ftrl {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<(), SizeMismatchErr> {
        if grad.len() != params.len() || self.accums.len() != params.len() {
            return Err(SizeMismatchErr {
                expected: params.len(),
                got: grad.len(),
            });
        }

        let config = &self.config;

        if params.len() >= PAR_THRESHOLD {
            params
                .par_iter_mut()
                .zip(grad.par_iter())
                .zip(self.accums.par_iter_mut())
                .for_each(|((w, &g), acc)| Self::step(config, acc, w, g));
        } else {
            params
                .iter_mut()
                .zip(grad)
                .zip(self.accums.iter_mut())
                .for_each(|((w, &g), acc)| Self::step(config, acc, w, g));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_regression() {
        let mut ftrl = Ftrl::new(1, FtrlConfig::default());
        let mut params = [0.];

        ftrl.update_params(&[0.5], &mut params).unwrap();

        let (g, n) = ftrl.accumulators().next().unwrap();
        assert_eq!(g, 0.5);
        assert_eq!(n, 0.25);
        assert_eq!(params[0].to_bits(), 0xbd05_cc58);
    }

    #[test]
    fn second_step_uses_previous_weight() {
        let mut ftrl = Ftrl::new(1, FtrlConfig::default());
        let mut params = [0.];

        ftrl.update_params(&[0.5], &mut params).unwrap();
        ftrl.update_params(&[0.5], &mut params).unwrap();

        let (g, n) = ftrl.accumulators().next().unwrap();
        assert_eq!(g.to_bits(), 0x3f88_a8d8);
        assert_eq!(n.to_bits(), 0x3fb1_e7aa);
        assert_eq!(params[0].to_bits(), 0xbd46_d0a8);
    }

    #[test]
    fn small_gradient_clamps_to_zero() {
        let mut ftrl = Ftrl::new(2, FtrlConfig::default());
        let mut params = [0.3, -0.3];

        ftrl.update_params(&[0., 0.], &mut params).unwrap();
        assert_eq!(params, [0., 0.]);
    }

    #[test]
    fn deterministic_from_same_state() {
        let mut a = Ftrl::new(3, FtrlConfig::default());
        let mut params_a = [0.1, -0.2, 0.3];
        a.update_params(&[0.4, 0.5, -0.6], &mut params_a).unwrap();

        let mut b = a.clone();
        let mut params_b = params_a;
        let grad = [1.5, -0.25, 0.75];

        a.update_params(&grad, &mut params_a).unwrap();
        b.update_params(&grad, &mut params_b).unwrap();

        assert_eq!(params_a, params_b);
        assert!(a.accumulators().eq(b.accumulators()));
    }

    #[test]
    fn parallel_matches_sequential() {
        const LEN: usize = PAR_THRESHOLD + 3;

        let grad: Vec<f32> = (0..LEN).map(|i| (i % 17) as f32 * 0.1 - 0.8).collect();
        let mut params = vec![0.; LEN];
        let mut ftrl = Ftrl::new(LEN, FtrlConfig::default());
        ftrl.update_params(&grad, &mut params).unwrap();

        for (i, (&w, &g)) in params.iter().zip(&grad).enumerate() {
            let mut acc = Accum::default();
            let mut expected = 0.;
            Ftrl::step(&FtrlConfig::default(), &mut acc, &mut expected, g);
            assert_eq!(w.to_bits(), expected.to_bits(), "Weight mismatch at index {i}");
        }
    }

    #[test]
    fn rejects_mismatch_untouched() {
        let mut ftrl = Ftrl::new(2, FtrlConfig::default());
        let mut params = [1., 2.];

        let err = ftrl.update_params(&[1.], &mut params).unwrap_err();
        assert_eq!(err, SizeMismatchErr { expected: 2, got: 1 });
        assert_eq!(params, [1., 2.]);
        assert!(ftrl.accumulators().all(|acc| acc == (0., 0.)));
    }
}

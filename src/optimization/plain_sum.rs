use super::Optimizer;
use crate::storage::SizeMismatchErr;

/// Adds the incoming gradient straight into the parameters, keeps no extra state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSum;

impl PlainSum {
    /// Creates a new `PlainSum` optimizer.
    pub fn new() -> Self {
        Self
    }
}

impl Optimizer for PlainSum {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<(), SizeMismatchErr> {
        if grad.len() != params.len() {
            return Err(SizeMismatchErr {
                expected: params.len(),
                got: grad.len(),
            });
        }

        params.iter_mut().zip(grad).for_each(|(p, g)| *p += g);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_gradient() {
        let mut params = [1.0, -2.0, 0.5];
        PlainSum.update_params(&[1.0, 1.0, 1.0], &mut params).unwrap();
        assert_eq!(params, [2.0, -1.0, 1.5]);
    }

    #[test]
    fn rejects_mismatch_untouched() {
        let mut params = [1.0, 2.0];
        let err = PlainSum.update_params(&[1.0], &mut params).unwrap_err();

        assert_eq!(err, SizeMismatchErr { expected: 2, got: 1 });
        assert_eq!(params, [1.0, 2.0]);
    }
}

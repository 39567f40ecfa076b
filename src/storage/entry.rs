use crate::{optimization::Optimizer, storage::SizeMismatchErr};

/// The state held for a single key, its current parameters and the optimizer
/// owning the auxiliary state of every dimension.
///
/// The dimension of an entry is fixed when it's created.
#[derive(Debug, Clone)]
pub struct Entry<O: Optimizer> {
    params: Box<[f32]>,
    optimizer: O,
}

impl<O: Optimizer> Entry<O> {
    /// Creates a new `Entry`.
    ///
    /// # Arguments
    /// * `params` - The initial state of the parameters, stored as is.
    /// * `optimizer` - The optimization algorithm for this entry.
    ///
    /// # Returns
    /// A new `Entry` instance.
    pub fn new(params: Vec<f32>, optimizer: O) -> Self {
        Self {
            params: params.into_boxed_slice(),
            optimizer,
        }
    }

    /// Returns the dimension of this entry.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns the current parameters.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Returns the optimizer of this entry.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Fails with a `SizeMismatchErr` if `len` isn't the dimension of this entry.
    pub fn check_len(&self, len: usize) -> Result<(), SizeMismatchErr> {
        if self.params.len() != len {
            return Err(SizeMismatchErr {
                expected: self.params.len(),
                got: len,
            });
        }

        Ok(())
    }

    /// Applies the update rule once with `grad`.
    ///
    /// # Returns
    /// A `SizeMismatchErr` if `grad` isn't the same size as this entry.
    pub fn update(&mut self, grad: &[f32]) -> Result<(), SizeMismatchErr> {
        self.check_len(grad.len())?;
        self.optimizer.update_params(grad, &mut self.params)
    }
}

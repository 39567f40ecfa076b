use crate::storage::SizeMismatchErr;

/// Defines the strategy for updating the parameters of a key based on an aggregated gradient.
///
/// An instance is created per key and owns whatever auxiliary state the rule needs for
/// each dimension of that key.
pub trait Optimizer: Send {
    /// Updates the provided slice of parameters using the aggregated gradient.
    ///
    /// # Arguments
    /// * `grad` - The aggregated gradient for this key.
    /// * `params` - The parameters to update.
    ///
    /// # Returns
    /// A `SizeMismatchErr` if the sizes of `grad` and `params` differ, in which case
    /// nothing is modified.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<(), SizeMismatchErr>;
}

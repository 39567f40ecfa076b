use crate::storage::SizeMismatchErr;

/// How the gradients of a round are combined before updating the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// The arithmetic mean of the contributions.
    Mean,
    /// The plain sum of the contributions.
    Sum,
}

/// Accumulates the contributions of a synchronous round for a single key.
///
/// `grads` is empty between rounds, it's zero filled by the first contribution of a round.
/// `pending` keeps the requesters in arrival order.
#[derive(Debug)]
pub struct MergeBuffer<T> {
    grads: Vec<f32>,
    pending: Vec<T>,
}

impl<T> Default for MergeBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MergeBuffer<T> {
    pub fn new() -> Self {
        Self {
            grads: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Returns the amount of contributions of the current round.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the accumulated gradient of the current round.
    pub fn grads(&self) -> &[f32] {
        &self.grads
    }

    /// Adds `grad` into the accumulator and queues its requester.
    ///
    /// # Returns
    /// A `SizeMismatchErr` along with the requester if `grad` doesn't match the size of the
    /// previous contributions of this round, nothing is modified in that case.
    pub fn accumulate(&mut self, grad: &[f32], requester: T) -> Result<(), (SizeMismatchErr, T)> {
        if self.pending.is_empty() {
            self.grads.clear();
            self.grads.resize(grad.len(), 0.);
        } else if self.grads.len() != grad.len() {
            let err = SizeMismatchErr {
                expected: self.grads.len(),
                got: grad.len(),
            };
            return Err((err, requester));
        }

        self.grads.iter_mut().zip(grad).for_each(|(acc, g)| *acc += g);
        self.pending.push(requester);
        Ok(())
    }

    /// Combines the accumulated gradient in place.
    pub fn aggregate(&mut self, aggregation: Aggregation) {
        if aggregation == Aggregation::Mean && !self.pending.is_empty() {
            let n = self.pending.len() as f32;
            self.grads.iter_mut().for_each(|g| *g /= n);
        }
    }

    /// Ends the round, clearing the accumulator and returning the pending requesters.
    pub fn clear(&mut self) -> Vec<T> {
        self.grads.clear();
        self.pending.drain(..).collect()
    }
}

use super::Result;
use crate::storage::Key;

/// The worker side of the key-value protocol.
///
/// Every call resolves once the server acknowledged it, in synchronous mode a push only
/// resolves when it's round is complete.
#[allow(unused)]
#[trait_variant::make(KvClient: Send)]
pub trait KvClientTemplate {
    /// Pushes `values` for `key`, the initial parameters if the key is new or a gradient otherwise.
    ///
    /// # Returns
    /// An error if the push was rejected or the server went away.
    async fn push(&self, key: Key, values: Vec<f32>) -> Result<()>;

    /// Pulls the current parameters of `key`.
    ///
    /// # Returns
    /// The parameters or an error if the pull was rejected or the server went away.
    async fn pull(&self, key: Key) -> Result<Vec<f32>>;
}

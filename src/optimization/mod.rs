mod ftrl;
mod optimizer;
mod plain_sum;

pub use ftrl::{Ftrl, FtrlConfig};
pub use optimizer::Optimizer;
pub use plain_sum::PlainSum;

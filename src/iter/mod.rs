mod precision;
mod reducer;

pub use precision::Precision;
pub use reducer::{reduce, reduce_series, ReduceIterator};

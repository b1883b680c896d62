//! Streaming reducers that turn dense time series into a bounded number of
//! renderable points while keeping peaks, ranges and markers visible.
mod aggregators;
mod common;
mod config;
mod error;
mod iter;
mod session;
mod storage;

#[cfg(test)]
mod tests;

pub use aggregators::{
    Accumulator, AvgState, DiscardState, FlushOutput, MinMaxState, RangeMinMaxState, ReducePolicy, ReduceState,
};
pub use common::types::{EmittedPoint, Sample, SampleRef, Timestamp, MAX_MARKER_WEIGHT, MIN_MARKER_WEIGHT};
pub use config::{get_global_settings, Settings};
pub use error::{ReducerError, ReducerResult};
pub use iter::{reduce, reduce_series, Precision, ReduceIterator};
pub use session::{FilterSession, SessionState, StartToken, FILTER_PROTOCOL_VERSION};
pub use storage::SeriesBuffer;

mod avg;
mod discard;
mod min_max;
mod range_min_max;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::types::{EmittedPoint, Sample};
use crate::error::{ReducerError, ReducerResult};

pub use avg::AvgState;
pub use discard::DiscardState;
pub use min_max::MinMaxState;
pub use range_min_max::RangeMinMaxState;

/// How the samples of one accumulation interval are combined into renderable points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReducePolicy {
    /// keep the samples holding the minimum and the maximum value
    #[default]
    MinMax,
    /// emit the mean of every accumulated field
    Average,
    /// keep only the most recent sample
    Discard,
    /// emit one bar spanning the lowest low and the highest value
    RangeMinMax,
}

impl ReducePolicy {
    pub const ALL: [ReducePolicy; 4] = [
        ReducePolicy::MinMax,
        ReducePolicy::Average,
        ReducePolicy::Discard,
        ReducePolicy::RangeMinMax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReducePolicy::MinMax => "min_max",
            ReducePolicy::Average => "average",
            ReducePolicy::Discard => "discard",
            ReducePolicy::RangeMinMax => "range_min_max",
        }
    }

    /// Largest number of points a single flush can produce.
    pub fn max_points_per_flush(&self) -> usize {
        match self {
            ReducePolicy::MinMax => 2,
            _ => 1,
        }
    }
}

impl Display for ReducePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReducePolicy {
    type Err = ReducerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minmax" | "min_max" | "min-max" => Ok(ReducePolicy::MinMax),
            "average" | "avg" | "mean" => Ok(ReducePolicy::Average),
            "discard" | "last" => Ok(ReducePolicy::Discard),
            "range" | "range_min_max" | "range-min-max" | "rangeminmax" => Ok(ReducePolicy::RangeMinMax),
            _ => Err(ReducerError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<&str> for ReducePolicy {
    type Error = ReducerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for ReducePolicy {
    type Error = ReducerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReducePolicy> for String {
    fn from(policy: ReducePolicy) -> Self {
        policy.name().to_string()
    }
}

/// Result of flushing one accumulation interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlushOutput {
    /// nothing was accumulated
    Skip,
    Emit1(EmittedPoint),
    /// two points in ascending timestamp order
    Emit2(EmittedPoint, EmittedPoint),
}

impl FlushOutput {
    pub fn len(&self) -> usize {
        match self {
            FlushOutput::Skip => 0,
            FlushOutput::Emit1(_) => 1,
            FlushOutput::Emit2(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FlushOutput::Skip)
    }

    pub fn first(&self) -> Option<&EmittedPoint> {
        match self {
            FlushOutput::Skip => None,
            FlushOutput::Emit1(p) | FlushOutput::Emit2(p, _) => Some(p),
        }
    }

    pub fn into_points(self) -> impl Iterator<Item = EmittedPoint> {
        let (first, second) = match self {
            FlushOutput::Skip => (None, None),
            FlushOutput::Emit1(p) => (Some(p), None),
            FlushOutput::Emit2(a, b) => (Some(a), Some(b)),
        };
        first.into_iter().chain(second)
    }
}

/// Policy specific aggregate of the samples seen since the last flush.
pub trait ReduceState: Default {
    fn update(&mut self, sample: &Sample);

    fn finalize(&self) -> FlushOutput;

    fn count(&self) -> u64;

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub enum Accumulator {
    MinMax(MinMaxState),
    Average(AvgState),
    Discard(DiscardState),
    RangeMinMax(RangeMinMaxState),
}

impl Accumulator {
    pub fn new(policy: ReducePolicy) -> Self {
        match policy {
            ReducePolicy::MinMax => Accumulator::MinMax(MinMaxState::default()),
            ReducePolicy::Average => Accumulator::Average(AvgState::default()),
            ReducePolicy::Discard => Accumulator::Discard(DiscardState::default()),
            ReducePolicy::RangeMinMax => Accumulator::RangeMinMax(RangeMinMaxState::default()),
        }
    }

    pub fn try_new(policy: &str) -> ReducerResult<Self> {
        let policy: ReducePolicy = policy.parse()?;
        Ok(Self::new(policy))
    }

    pub fn policy(&self) -> ReducePolicy {
        match self {
            Accumulator::MinMax(_) => ReducePolicy::MinMax,
            Accumulator::Average(_) => ReducePolicy::Average,
            Accumulator::Discard(_) => ReducePolicy::Discard,
            Accumulator::RangeMinMax(_) => ReducePolicy::RangeMinMax,
        }
    }

    /// Folds a sample into the aggregate. Returns false if the sample was not usable.
    pub fn update(&mut self, sample: &Sample) -> bool {
        if !sample.valid || sample.value.is_nan() {
            return false;
        }
        let sample = &Sample {
            low: sample.low.filter(|low| !low.is_nan()),
            ..*sample
        };
        match self {
            Accumulator::MinMax(state) => state.update(sample),
            Accumulator::Average(state) => state.update(sample),
            Accumulator::Discard(state) => state.update(sample),
            Accumulator::RangeMinMax(state) => state.update(sample),
        }
        true
    }

    pub fn finalize(&self) -> FlushOutput {
        match self {
            Accumulator::MinMax(state) => state.finalize(),
            Accumulator::Average(state) => state.finalize(),
            Accumulator::Discard(state) => state.finalize(),
            Accumulator::RangeMinMax(state) => state.finalize(),
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Accumulator::MinMax(state) => state.count(),
            Accumulator::Average(state) => state.count(),
            Accumulator::Discard(state) => state.count(),
            Accumulator::RangeMinMax(state) => state.count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn reset(&mut self) {
        match self {
            Accumulator::MinMax(state) => state.reset(),
            Accumulator::Average(state) => state.reset(),
            Accumulator::Discard(state) => state.reset(),
            Accumulator::RangeMinMax(state) => state.reset(),
        }
    }
}

/// Running mean of timestamps, kept as offsets from the first one so large epoch
/// values do not lose precision in the sum.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TimestampMean {
    base: Option<f64>,
    offset_sum: f64,
}

impl TimestampMean {
    pub(crate) fn add(&mut self, timestamp: f64) {
        match self.base {
            None => self.base = Some(timestamp),
            Some(base) => self.offset_sum += timestamp - base,
        }
    }

    pub(crate) fn mean(&self, count: u64) -> f64 {
        match self.base {
            Some(base) if count > 0 => base + self.offset_sum / count as f64,
            _ => f64::NAN,
        }
    }
}

use super::{FlushOutput, ReduceState, TimestampMean};
use crate::common::types::{EmittedPoint, Sample};

/// Bar reduction for range series: the highest value over the lowest low, centered
/// on the mean timestamp of the interval.
///
/// The two extremes are tracked independently and may come from different samples.
#[derive(Debug, Clone, Copy)]
pub struct RangeMinMaxState {
    high: f64,
    low: f64,
    timestamps: TimestampMean,
    count: u64,
}

impl Default for RangeMinMaxState {
    fn default() -> Self {
        Self {
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            timestamps: TimestampMean::default(),
            count: 0,
        }
    }
}

impl ReduceState for RangeMinMaxState {
    fn update(&mut self, sample: &Sample) {
        self.high = self.high.max(sample.value);
        // samples without a companion low contribute their value
        self.low = self.low.min(sample.low.unwrap_or(sample.value));
        self.timestamps.add(sample.timestamp);
        self.count += 1;
    }

    fn finalize(&self) -> FlushOutput {
        if self.count == 0 {
            return FlushOutput::Skip;
        }
        let timestamp = self.timestamps.mean(self.count);
        FlushOutput::Emit1(EmittedPoint::synthetic(timestamp, self.high, Some(self.low), 0.0))
    }

    fn count(&self) -> u64 {
        self.count
    }
}

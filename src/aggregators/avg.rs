use super::{FlushOutput, ReduceState, TimestampMean};
use crate::common::types::{EmittedPoint, Sample};

/// Mean of value and timestamp over every sample in the interval.
///
/// The low is averaged only over the samples that carry one (`Σlow / samples with a low`),
/// and is `None` when none did.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvgState {
    sum: f64,
    count: u64,
    low_sum: f64,
    low_count: u64,
    timestamps: TimestampMean,
    marker_weight: f64,
}

impl ReduceState for AvgState {
    fn update(&mut self, sample: &Sample) {
        self.sum += sample.value;
        self.count += 1;
        if let Some(low) = sample.low {
            self.low_sum += low;
            self.low_count += 1;
        }
        self.timestamps.add(sample.timestamp);
        self.marker_weight = self.marker_weight.max(sample.marker_weight);
    }

    fn finalize(&self) -> FlushOutput {
        if self.count == 0 {
            return FlushOutput::Skip;
        }
        let value = self.sum / self.count as f64;
        let low = (self.low_count > 0).then(|| self.low_sum / self.low_count as f64);
        let timestamp = self.timestamps.mean(self.count);
        FlushOutput::Emit1(EmittedPoint::synthetic(timestamp, value, low, self.marker_weight))
    }

    fn count(&self) -> u64 {
        self.count
    }
}

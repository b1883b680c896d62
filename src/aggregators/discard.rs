use super::{FlushOutput, ReduceState};
use crate::common::types::{EmittedPoint, Sample};

/// Keeps the latest sample of the interval. Markers of dropped samples are folded
/// into the emitted point.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardState {
    last: Option<Sample>,
    marker_weight: f64,
    count: u64,
}

impl ReduceState for DiscardState {
    fn update(&mut self, sample: &Sample) {
        self.last = Some(*sample);
        self.marker_weight = self.marker_weight.max(sample.marker_weight);
        self.count += 1;
    }

    fn finalize(&self) -> FlushOutput {
        match &self.last {
            Some(last) => {
                let mut point = EmittedPoint::from(last);
                point.marker_weight = self.marker_weight;
                FlushOutput::Emit1(point)
            }
            None => FlushOutput::Skip,
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}

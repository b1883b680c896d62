use super::{FlushOutput, ReduceState};
use crate::common::types::{EmittedPoint, Sample};

/// Keeps the whole samples holding the extremes so markers and origins survive.
///
/// The minimum sticks to the first sample reaching it, the maximum moves to the last
/// sample reaching it. A flat interval therefore collapses onto the midpoint between
/// its first and last sample.
#[derive(Debug, Default, Clone)]
pub struct MinMaxState {
    min: Option<Sample>,
    max: Option<Sample>,
    count: u64,
}

impl MinMaxState {
    pub fn min(&self) -> Option<&Sample> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Sample> {
        self.max.as_ref()
    }
}

impl ReduceState for MinMaxState {
    fn update(&mut self, sample: &Sample) {
        if self.min.map_or(true, |min| sample.value < min.value) {
            self.min = Some(*sample);
        }
        if self.max.map_or(true, |max| sample.value >= max.value) {
            self.max = Some(*sample);
        }
        self.count += 1;
    }

    fn finalize(&self) -> FlushOutput {
        let (Some(min), Some(max)) = (&self.min, &self.max) else {
            return FlushOutput::Skip;
        };

        if min.value == max.value {
            let timestamp = (min.timestamp + max.timestamp) / 2.0;
            let marker_weight = min.marker_weight.max(max.marker_weight);
            return FlushOutput::Emit1(EmittedPoint::synthetic(timestamp, max.value, None, marker_weight));
        }

        let (min, max) = (EmittedPoint::from(min), EmittedPoint::from(max));
        if min.timestamp <= max.timestamp {
            FlushOutput::Emit2(min, max)
        } else {
            FlushOutput::Emit2(max, min)
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::SampleRef;

    fn state_from(samples: &[(f64, f64)]) -> MinMaxState {
        let mut state = MinMaxState::default();
        for (i, (t, v)) in samples.iter().enumerate() {
            state.update(&Sample::new(SampleRef(i), *t, *v));
        }
        state
    }

    #[test]
    fn test_emits_extremes_in_time_order() {
        let state = state_from(&[(1.0, 9.0), (2.0, 3.0)]);
        let FlushOutput::Emit2(a, b) = state.finalize() else {
            panic!("expected two points");
        };
        assert_eq!((a.timestamp, a.value, a.origin), (1.0, 9.0, Some(SampleRef(0))));
        assert_eq!((b.timestamp, b.value, b.origin), (2.0, 3.0, Some(SampleRef(1))));
    }

    #[test]
    fn test_flat_interval_collapses_to_midpoint() {
        let state = state_from(&[(0.0, 7.0), (1.0, 7.0)]);
        assert_eq!(
            state.finalize(),
            FlushOutput::Emit1(EmittedPoint::synthetic(0.5, 7.0, None, 0.0))
        );
    }

    #[test]
    fn test_single_sample_collapses_onto_itself() {
        let state = state_from(&[(4.0, 1.5)]);
        assert_eq!(
            state.finalize(),
            FlushOutput::Emit1(EmittedPoint::synthetic(4.0, 1.5, None, 0.0))
        );
    }

    #[test]
    fn test_ties_keep_first_min_and_last_max() {
        let state = state_from(&[(0.0, 1.0), (1.0, 5.0), (2.0, 1.0), (3.0, 5.0)]);
        assert_eq!(state.min().map(|s| s.origin), Some(SampleRef(0)));
        assert_eq!(state.max().map(|s| s.origin), Some(SampleRef(3)));
    }

    #[test]
    fn test_markers_follow_their_sample() {
        let mut state = MinMaxState::default();
        state.update(&Sample::new(SampleRef(0), 0.0, 2.0).with_marker_weight(0.75));
        state.update(&Sample::new(SampleRef(1), 1.0, 8.0));
        state.update(&Sample::new(SampleRef(2), 2.0, 5.0).with_marker_weight(1.0));
        let FlushOutput::Emit2(a, b) = state.finalize() else {
            panic!("expected two points");
        };
        assert_eq!(a.marker_weight, 0.75);
        assert_eq!(b.marker_weight, 0.0);
    }

    #[test]
    fn test_collapse_keeps_strongest_marker() {
        let mut state = MinMaxState::default();
        state.update(&Sample::new(SampleRef(0), 0.0, 2.0).with_marker_weight(0.25));
        state.update(&Sample::new(SampleRef(1), 2.0, 2.0).with_marker_weight(0.5));
        let FlushOutput::Emit1(p) = state.finalize() else {
            panic!("expected one point");
        };
        assert_eq!(p.marker_weight, 0.5);
        assert_eq!(p.timestamp, 1.0);
        assert!(p.is_synthetic());
    }

    #[test]
    fn test_equal_timestamps_emit_min_first() {
        let state = state_from(&[(1.0, 4.0), (1.0, 2.0)]);
        let FlushOutput::Emit2(a, b) = state.finalize() else {
            panic!("expected two points");
        };
        assert_eq!(a.value, 2.0);
        assert_eq!(b.value, 4.0);
    }

    #[test]
    fn test_empty_state_skips() {
        assert_eq!(MinMaxState::default().finalize(), FlushOutput::Skip);
    }
}

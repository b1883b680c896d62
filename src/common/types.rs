use std::fmt::Display;

pub type Timestamp = f64;

pub const MIN_MARKER_WEIGHT: f64 = 0.0;
pub const MAX_MARKER_WEIGHT: f64 = 1.0;

/// Position of a sample inside the buffer that owns it.
///
/// A reducer never owns samples. It only carries this index from `add_sample` to the
/// point it emits, so the consumer can look up the extended attributes of the
/// original sample in its own buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleRef(pub usize);

impl SampleRef {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for SampleRef {
    fn from(index: usize) -> Self {
        SampleRef(index)
    }
}

impl Display for SampleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub value: f64,
    /// false for gaps and sensor errors. Invalid samples are never aggregated.
    pub valid: bool,
    /// Marker visibility in [0, 1]. Zero means no marker.
    pub marker_weight: f64,
    /// Lower bound for range style series.
    pub low: Option<f64>,
    pub origin: SampleRef,
}

impl Sample {
    pub fn new(origin: SampleRef, timestamp: Timestamp, value: f64) -> Self {
        Sample {
            timestamp,
            value,
            valid: !value.is_nan(),
            marker_weight: MIN_MARKER_WEIGHT,
            low: None,
            origin,
        }
    }

    /// A NaN low counts as no low at all.
    pub fn with_low(mut self, low: f64) -> Self {
        self.low = Some(low).filter(|low| !low.is_nan());
        self
    }

    pub fn with_marker_weight(mut self, weight: f64) -> Self {
        self.marker_weight = clamp_marker_weight(weight);
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn has_marker(&self) -> bool {
        self.marker_weight > MIN_MARKER_WEIGHT
    }
}

/// A point handed to the renderer after a flush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmittedPoint {
    pub timestamp: Timestamp,
    pub value: f64,
    pub low: Option<f64>,
    pub marker_weight: f64,
    /// `None` for points computed from several samples.
    pub origin: Option<SampleRef>,
}

impl EmittedPoint {
    pub fn synthetic(timestamp: Timestamp, value: f64, low: Option<f64>, marker_weight: f64) -> Self {
        EmittedPoint {
            timestamp,
            value,
            low,
            marker_weight,
            origin: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin.is_none()
    }
}

impl From<&Sample> for EmittedPoint {
    fn from(sample: &Sample) -> Self {
        EmittedPoint {
            timestamp: sample.timestamp,
            value: sample.value,
            low: sample.low,
            marker_weight: sample.marker_weight,
            origin: Some(sample.origin),
        }
    }
}

pub(crate) fn clamp_marker_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return MIN_MARKER_WEIGHT;
    }
    weight.clamp(MIN_MARKER_WEIGHT, MAX_MARKER_WEIGHT)
}

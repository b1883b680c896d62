use crate::common::types::{EmittedPoint, Sample, SampleRef, Timestamp};
use crate::error::{ReducerError, ReducerResult};

/// Append-only, time ordered samples of one series.
///
/// Every sample records its own position as its origin, so points emitted by a
/// filter session can be traced back here with [`SeriesBuffer::resolve`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeriesBuffer {
    samples: Vec<Sample>,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, ts: Timestamp, value: f64) -> ReducerResult<SampleRef> {
        self.push_with(ts, value, |sample| sample)
    }

    /// Appends a sample, letting `build` set its optional attributes.
    pub fn push_with<F>(&mut self, ts: Timestamp, value: f64, build: F) -> ReducerResult<SampleRef>
    where
        F: FnOnce(Sample) -> Sample,
    {
        if !ts.is_finite() {
            return Err(ReducerError::InvalidTimestamp(ts.to_string()));
        }
        if let Some(last) = self.last_timestamp() {
            if ts < last {
                return Err(ReducerError::OutOfOrderSample { timestamp: ts, last });
            }
        }
        let origin = SampleRef(self.samples.len());
        let mut sample = build(Sample::new(origin, ts, value));
        // the builder may not move the sample or rewrite its identity
        sample.timestamp = ts;
        sample.origin = origin;
        self.samples.push(sample);
        Ok(origin)
    }

    pub fn get(&self, sample_ref: SampleRef) -> Option<&Sample> {
        self.samples.get(sample_ref.index())
    }

    /// The sample behind a non synthetic point.
    pub fn resolve(&self, point: &EmittedPoint) -> Option<&Sample> {
        point.origin.and_then(|origin| self.get(origin))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.timestamp)
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Samples with `start <= timestamp < end`.
    pub fn range(&self, start: Timestamp, end: Timestamp) -> &[Sample] {
        if end <= start {
            return &[];
        }
        let lo = self.samples.partition_point(|s| s.timestamp < start);
        let hi = self.samples.partition_point(|s| s.timestamp < end);
        &self.samples[lo..hi]
    }
}

impl<'a> IntoIterator for &'a SeriesBuffer {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

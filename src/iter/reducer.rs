use tracing::trace;

use super::precision::interval_index;
use crate::common::types::{EmittedPoint, Sample, Timestamp};
use crate::config::Settings;
use crate::error::{ReducerError, ReducerResult};
use crate::iter::Precision;
use crate::session::FilterSession;

/// Drives a [`FilterSession`] through one render pass: splits the incoming samples
/// into fixed width intervals, flushes at every interval change and around marked
/// samples, and collects the emitted points.
#[derive(Debug)]
pub struct ReduceIterator<'a> {
    session: &'a mut FilterSession,
    width: f64,
    alignment: Timestamp,
    current_interval: Option<i64>,
    last_timestamp: Option<Timestamp>,
    points: Vec<EmittedPoint>,
}

impl<'a> ReduceIterator<'a> {
    pub fn new(session: &'a mut FilterSession, precision: Precision, alignment: Timestamp) -> ReducerResult<Self> {
        let width = precision.interval_width()?;
        if !alignment.is_finite() {
            return Err(ReducerError::InvalidConfiguration(format!("alignment must be finite, got {alignment}")));
        }
        session.start();
        Ok(ReduceIterator {
            session,
            width,
            alignment,
            current_interval: None,
            last_timestamp: None,
            points: Vec::new(),
        })
    }

    pub fn interval_width(&self) -> f64 {
        self.width
    }

    pub fn points(&self) -> &[EmittedPoint] {
        &self.points
    }

    pub fn push(&mut self, sample: &Sample) -> ReducerResult<()> {
        if !sample.valid || sample.value.is_nan() {
            return Ok(());
        }
        let timestamp = sample.timestamp;
        if !timestamp.is_finite() {
            return Err(ReducerError::InvalidTimestamp(format!("{timestamp} at sample {}", sample.origin)));
        }
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                return Err(ReducerError::OutOfOrderSample { timestamp, last });
            }
        }
        self.last_timestamp = Some(timestamp);

        let interval = interval_index(timestamp, self.width, self.alignment).ok_or_else(|| {
            ReducerError::InvalidPrecision(format!(
                "interval width {} is too small for timestamp {timestamp} aligned to {}",
                self.width, self.alignment
            ))
        })?;
        if self.current_interval != Some(interval) {
            self.flush_interval();
            self.current_interval = Some(interval);
        }

        if self.session.requires_isolation(sample) {
            trace!(origin = %sample.origin, weight = sample.marker_weight, "isolating marked sample");
            self.flush_interval();
            self.session.add_sample(sample);
            self.flush_interval();
        } else {
            self.session.add_sample(sample);
        }
        Ok(())
    }

    /// Flushes the open interval, ends the pass and returns every emitted point.
    pub fn finish(mut self) -> Vec<EmittedPoint> {
        self.flush_interval();
        self.session.finish();
        self.points
    }

    fn flush_interval(&mut self) {
        for point in self.session.flush().into_points() {
            debug_assert!(
                self.points.last().map_or(true, |last| last.timestamp <= point.timestamp),
                "emitted timestamps went backwards"
            );
            self.points.push(point);
        }
    }
}

/// Runs one pass of `session` over `samples`.
pub fn reduce_series<'s>(
    session: &mut FilterSession,
    samples: impl IntoIterator<Item = &'s Sample>,
    precision: Precision,
    alignment: Timestamp,
) -> ReducerResult<Vec<EmittedPoint>> {
    let mut iter = ReduceIterator::new(session, precision, alignment)?;
    for sample in samples {
        iter.push(sample)?;
    }
    Ok(iter.finish())
}

/// Reduces `samples` with a throwaway session built from `settings`.
pub fn reduce(settings: &Settings, samples: impl IntoIterator<Item = Sample>) -> ReducerResult<Vec<EmittedPoint>> {
    settings.validate()?;
    let mut session = FilterSession::from_settings(settings);
    let points = {
        let mut iter = ReduceIterator::new(&mut session, settings.precision, settings.alignment)?;
        for sample in samples {
            iter.push(&sample)?;
        }
        iter.finish()
    };
    session.destroy();
    Ok(points)
}

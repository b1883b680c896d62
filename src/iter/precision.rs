use serde::{Deserialize, Serialize};

use crate::common::types::Timestamp;
use crate::error::{ReducerError, ReducerResult};

/// Resolution at which samples are merged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Fixed time span per interval.
    Interval(f64),
    /// Span derived from the visible time range and the plot width.
    Pixels {
        start: Timestamp,
        end: Timestamp,
        pixels: u32,
        points_per_pixel: f64,
    },
}

impl Precision {
    pub fn interval_width(&self) -> ReducerResult<f64> {
        let width = match *self {
            Precision::Interval(width) => width,
            Precision::Pixels { start, end, pixels, points_per_pixel } => {
                if pixels == 0 {
                    return Err(ReducerError::InvalidPrecision("plot width is zero pixels".to_string()));
                }
                (end - start) / (pixels as f64 * points_per_pixel)
            }
        };
        if !width.is_finite() || width <= 0.0 {
            return Err(ReducerError::InvalidPrecision(format!(
                "interval width must be positive and finite, got {width}"
            )));
        }
        Ok(width)
    }
}

/// Index of the interval holding `ts`, counted from `alignment`. `None` if the index
/// does not fit in an `i64`, which happens when `width` is tiny next to the distance
/// from `alignment`.
#[inline]
pub(crate) fn interval_index(ts: Timestamp, width: f64, alignment: Timestamp) -> Option<i64> {
    let index = ((ts - alignment) / width).floor();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    (index.is_finite() && index >= i64::MIN as f64 && index < i64::MAX as f64).then_some(index as i64)
}

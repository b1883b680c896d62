use std::ops::Range;

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::storage::SeriesBuffer;
use crate::tests::generators::create_rng;

#[derive(Debug, Copy, Clone, Default)]
pub enum RandAlgo {
    #[default]
    Rand,
    Norm,
    Deriv,
}

/// GeneratorOptions contains the parameters for generating random series.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Timestamp of the first sample.
    pub start: f64,
    /// Average distance between samples. Each step is jittered by up to half of it.
    pub interval: f64,
    /// Range of values.
    pub range: Range<f64>,
    /// Number of samples.
    pub samples: usize,
    /// Share of samples flagged invalid.
    pub gap_ratio: f64,
    /// Share of samples carrying a marker.
    pub marker_ratio: f64,
    /// Attach a companion low value below each value.
    pub with_low: bool,
    /// Seed for random number generator.
    pub seed: Option<u64>,
    /// Type of random number generator.
    pub typ: RandAlgo,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            start: 0.0,
            interval: 1.0,
            range: 0.0..100.0,
            samples: 1000,
            gap_ratio: 0.0,
            marker_ratio: 0.0,
            with_low: false,
            seed: None,
            typ: RandAlgo::Rand,
        }
    }
}

trait NumGenerator {
    fn next(&mut self) -> f64;
}

struct RandomGenerator {
    rng: StdRng,
    range: Range<f64>,
}

impl NumGenerator for RandomGenerator {
    fn next(&mut self) -> f64 {
        self.rng.gen_range(self.range.start..self.range.end)
    }
}

struct NormalGenerator {
    rng: StdRng,
    range: Range<f64>,
}

impl NumGenerator for NormalGenerator {
    fn next(&mut self) -> f64 {
        let m = self.rng.sample::<f64, _>(StandardNormal);
        self.range.start + (self.range.end - self.range.start) * m
    }
}

struct DerivativeGenerator {
    p: f64,
    n: f64,
}

impl NumGenerator for DerivativeGenerator {
    fn next(&mut self) -> f64 {
        let v = (self.n - self.p) / 2.0;
        self.p = self.n;
        self.n += v;
        v
    }
}

fn get_value_in_range(rng: &mut StdRng, r: &Range<f64>) -> f64 {
    r.start + (r.end - r.start) * rng.gen::<f64>()
}

fn get_generator_impl(
    typ: RandAlgo,
    seed: Option<u64>,
    range: &Range<f64>,
) -> Result<Box<dyn NumGenerator>, String> {
    let mut rng = create_rng(seed)?;
    let range = range.clone();
    Ok(match typ {
        RandAlgo::Rand => Box::new(RandomGenerator { rng, range }),
        RandAlgo::Norm => Box::new(NormalGenerator { rng, range }),
        RandAlgo::Deriv => {
            let p = get_value_in_range(&mut rng, &range);
            let n = p + get_value_in_range(&mut rng, &range);
            Box::new(DerivativeGenerator { p, n })
        }
    })
}

/// Generates a time ordered series with jittered timestamps, random gaps and markers.
pub fn generate_series(options: &GeneratorOptions) -> Result<SeriesBuffer, String> {
    let mut values = get_generator_impl(options.typ, options.seed, &options.range)?;
    // attributes use their own stream so values do not depend on the ratios
    let mut rng = create_rng(options.seed.map(|s| s.wrapping_add(1)))?;
    let mut buf = SeriesBuffer::with_capacity(options.samples);

    let mut t = options.start;
    for _ in 0..options.samples {
        let value = values.next();
        let valid = !rng.gen_bool(options.gap_ratio);
        let marker = if rng.gen_bool(options.marker_ratio) {
            rng.gen_range(0.1..=1.0)
        } else {
            0.0
        };
        let low = options.with_low.then(|| value - rng.gen_range(0.0..10.0));
        buf.push_with(t, value, |s| {
            let s = s.with_valid(valid).with_marker_weight(marker);
            match low {
                Some(low) => s.with_low(low),
                None => s,
            }
        })
        .map_err(|e| e.to_string())?;
        t += options.interval * rng.gen_range(0.5..1.5);
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_series_is_ordered() {
        let options = GeneratorOptions {
            samples: 500,
            gap_ratio: 0.1,
            marker_ratio: 0.05,
            with_low: true,
            seed: Some(42),
            ..Default::default()
        };
        let buf = generate_series(&options).unwrap();
        assert_eq!(buf.len(), 500);
        let samples = buf.as_slice();
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(samples.iter().all(|s| s.low.is_some_and(|low| low <= s.value)));
        assert!(samples.iter().any(|s| !s.valid));
    }

    #[test]
    fn test_seeded_generation_is_repeatable() {
        for typ in [RandAlgo::Rand, RandAlgo::Norm, RandAlgo::Deriv] {
            let options = GeneratorOptions {
                samples: 50,
                seed: Some(7),
                typ,
                ..Default::default()
            };
            assert_eq!(generate_series(&options).unwrap(), generate_series(&options).unwrap());
        }
    }
}

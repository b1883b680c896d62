use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::aggregators::ReducePolicy;
use crate::error::{ReducerError, ReducerResult};
use crate::iter::Precision;

pub const DEFAULT_INTERVAL: f64 = 1.0;

pub const ENV_POLICY: &str = "CHART_REDUCER_POLICY";
pub const ENV_PRESERVE_MARKERS: &str = "CHART_REDUCER_PRESERVE_MARKERS";
pub const ENV_INTERVAL: &str = "CHART_REDUCER_INTERVAL";
pub const ENV_ALIGNMENT: &str = "CHART_REDUCER_ALIGNMENT";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Aggregation applied to every interval. Fixed for the life of a session.
    pub policy: ReducePolicy,
    /// Flush around samples carrying a marker so they are never merged away.
    pub preserve_markers: bool,
    /// Width of one accumulation interval.
    pub precision: Precision,
    /// Timestamp that interval boundaries are aligned to.
    pub alignment: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: ReducePolicy::MinMax,
            preserve_markers: true,
            precision: Precision::Interval(DEFAULT_INTERVAL),
            alignment: 0.0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> ReducerResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overridden by any `CHART_REDUCER_*` environment variable that is set.
    pub fn from_env() -> ReducerResult<Self> {
        let mut settings = Settings::default();
        if let Some(policy) = get_setting_from_env::<String>(ENV_POLICY)? {
            settings.policy = policy.parse()?;
        }
        if let Some(preserve) = get_setting_from_env::<bool>(ENV_PRESERVE_MARKERS)? {
            settings.preserve_markers = preserve;
        }
        if let Some(interval) = get_setting_from_env::<f64>(ENV_INTERVAL)? {
            settings.precision = Precision::Interval(interval);
        }
        if let Some(alignment) = get_setting_from_env::<f64>(ENV_ALIGNMENT)? {
            settings.alignment = alignment;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ReducerResult<()> {
        self.precision.interval_width()?;
        if !self.alignment.is_finite() {
            return Err(ReducerError::InvalidConfiguration(format!(
                "alignment must be finite, got {}",
                self.alignment
            )));
        }
        Ok(())
    }
}

static GLOBAL_SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process wide settings, read from the environment on first use. Falls back to the
/// defaults if the environment holds an invalid value.
pub fn get_global_settings() -> &'static Settings {
    GLOBAL_SETTINGS.get_or_init(|| {
        Settings::from_env().unwrap_or_else(|err| {
            tracing::warn!("ignoring reducer settings from environment: {err}");
            Settings::default()
        })
    })
}

fn get_setting_from_env<T: FromStr>(name: &str) -> ReducerResult<Option<T>> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ReducerError::InvalidConfiguration(format!("{name}: invalid value \"{raw}\"")))
}

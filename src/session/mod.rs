//! Stateful filter driven by a renderer for one series.
//!
//! A session lives as long as its series. Each render pass calls [`FilterSession::start`],
//! then feeds samples in time order with [`FilterSession::add_sample`], calling
//! [`FilterSession::flush`] whenever the next sample leaves the current interval or a
//! marked sample has to stay visible, and ends with [`FilterSession::finish`].
use std::fmt::Display;

use tracing::{debug, trace, warn};

use crate::aggregators::{Accumulator, FlushOutput, ReducePolicy};
use crate::common::types::Sample;
use crate::config::Settings;
use crate::error::ReducerResult;

pub const FILTER_PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Accumulating,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Accumulating => write!(f, "accumulating"),
        }
    }
}

/// Returned by [`FilterSession::start`] to acknowledge a new pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartToken {
    pub version: u32,
    /// 1 based number of the pass on this session
    pub pass: u64,
}

#[derive(Debug, Clone)]
pub struct FilterSession {
    accumulator: Accumulator,
    preserve_markers: bool,
    state: SessionState,
    passes: u64,
}

impl FilterSession {
    pub fn new(policy: ReducePolicy, preserve_markers: bool) -> Self {
        debug!(%policy, preserve_markers, "creating filter session");
        FilterSession {
            accumulator: Accumulator::new(policy),
            preserve_markers,
            state: SessionState::Idle,
            passes: 0,
        }
    }

    /// Builds a session from a policy identifier. An unknown identifier leaves no
    /// usable session behind.
    pub fn try_new(policy: &str, preserve_markers: bool) -> ReducerResult<Self> {
        let policy: ReducePolicy = policy.parse()?;
        Ok(Self::new(policy, preserve_markers))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.policy, settings.preserve_markers)
    }

    pub fn policy(&self) -> ReducePolicy {
        self.accumulator.policy()
    }

    pub fn preserve_markers(&self) -> bool {
        self.preserve_markers
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of samples folded in since the last flush.
    pub fn pending(&self) -> u64 {
        self.accumulator.count()
    }

    /// True if the host has to flush around this sample to keep its marker visible.
    pub fn requires_isolation(&self, sample: &Sample) -> bool {
        self.preserve_markers && sample.valid && sample.has_marker()
    }

    pub fn start(&mut self) -> StartToken {
        if self.accumulator.count() > 0 {
            trace!(pending = self.accumulator.count(), "discarding unflushed samples");
        }
        self.accumulator.reset();
        self.state = SessionState::Accumulating;
        self.passes += 1;
        debug!(pass = self.passes, policy = %self.policy(), "filter pass started");
        StartToken {
            version: FILTER_PROTOCOL_VERSION,
            pass: self.passes,
        }
    }

    pub fn add_sample(&mut self, sample: &Sample) {
        if !sample.valid {
            return;
        }
        if self.state == SessionState::Idle {
            if self.passes == 0 {
                warn!("sample added before start, starting an implicit pass");
                self.start();
            } else {
                // after finish: keep what is pending, only start resets
                trace!(pending = self.accumulator.count(), "sample added after finish");
                self.state = SessionState::Accumulating;
            }
        }
        self.accumulator.update(sample);
    }

    pub fn flush(&mut self) -> FlushOutput {
        let output = self.accumulator.finalize();
        trace!(samples = self.accumulator.count(), points = output.len(), "flush");
        self.accumulator.reset();
        output
    }

    /// Ends the render pass. Samples that were not flushed stay pending until the next
    /// `flush` or `start`, including samples added after this call.
    pub fn finish(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn destroy(self) {
        debug!(passes = self.passes, "filter session destroyed");
    }
}

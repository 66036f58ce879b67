//! Engine construction parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EngineError, Result, DEFAULT_AMPLITUDE, DEFAULT_SAMPLE_RATE};

/// Constants fixed for the lifetime of a [`ToneEngine`](crate::ToneEngine).
///
/// Validate before any audio stream is opened; an engine is never built from
/// a config that fails [`EngineConfig::validate`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Peak sample magnitude of the square wave (out of the i16 range).
    pub amplitude: i16,
    /// Maximum number of queued tone events. The queue never grows past this.
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
            queue_capacity: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_amplitude(mut self, amplitude: i16) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidConfig("sample rate must be non-zero"));
        }
        if self.amplitude <= 0 {
            return Err(EngineError::InvalidConfig("amplitude must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig("queue capacity must be non-zero"));
        }
        Ok(())
    }

    /// Number of output samples owed for a tone of `seconds`.
    ///
    /// Negative and non-finite durations give zero.
    pub fn samples_for(&self, seconds: f64) -> u64 {
        let samples = (seconds * self.sample_rate as f64).round();
        if samples.is_finite() && samples > 0.0 {
            samples as u64
        } else {
            0
        }
    }
}

//! Controller configuration parameters
//!
//! All tunable timing and policy parameters for the KnobDimmer controller.
//! Values are fixed at build time: the defaults below, optionally replaced
//! by a JSON document baked in through the `KNOBDIMMER_CONFIG` environment
//! variable (see `main.rs`).  Nothing is persisted at runtime.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::app::state::DutyCycle;

/// What happens to encoder events that queue up while the LEDs are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleEventPolicy {
    /// Throw them away while off and clear the queue on power-on.
    Discard,
    /// Leave them queued; they replay one per loop iteration after power-on.
    Preserve,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Debounce ---
    /// Interval between raw push-button samples (milliseconds)
    pub debounce_interval_ms: u32,
    /// Consecutive consistent samples required for a verdict
    pub debounce_threshold: u8,

    // --- Toggle ---
    /// Poll interval while waiting for the button to be released (milliseconds)
    pub release_poll_ms: u32,
    /// Brightness restored when the remembered level is 0 %
    pub fallback_brightness_percent: DutyCycle,

    // --- Input polarity ---
    /// Button pulls the line LOW when pressed
    pub button_active_low: bool,

    // --- Encoder ---
    pub stale_encoder_events: StaleEventPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_interval_ms: 10,
            debounce_threshold: 3,

            release_poll_ms: 50,
            fallback_brightness_percent: DutyCycle::FALLBACK,

            button_active_low: true,

            stale_encoder_events: StaleEventPolicy::Discard,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON config document.  Missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the main loop or restore to darkness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_interval_ms must be > 0"));
        }
        if self.debounce_threshold == 0 {
            return Err(ConfigError::ValidationFailed("debounce_threshold must be > 0"));
        }
        if self.release_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("release_poll_ms must be > 0"));
        }
        if self.fallback_brightness_percent.is_off() {
            return Err(ConfigError::ValidationFailed(
                "fallback_brightness_percent must be non-zero",
            ));
        }
        Ok(())
    }
}

//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BrightnessController (domain)
//! ```
//!
//! Driven adapters (push-button sampler, LED bank, event sinks) implement
//! these traits.  The [`BrightnessController`](super::controller::BrightnessController)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Blocking waits go through `embedded_hal::delay::DelayNs`.

use super::state::DutyCycle;

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw push-button sampling.  No filtering happens behind this trait;
/// debouncing is the controller's job.
pub trait ButtonPort {
    /// Instantaneous "is the button held down" reading, polarity already
    /// resolved by the adapter.
    fn is_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the LED outputs.
pub trait PwmPort {
    /// Drive every LED channel to `duty`, simultaneously.
    fn apply_duty(&mut self, duty: DutyCycle);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading a [`ControllerConfig`](crate::config::ControllerConfig).
#[derive(Debug, Clone, Copy)]
pub enum ConfigError {
    /// Document could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

//! Outbound application events.
//!
//! The [`BrightnessController`](super::controller::BrightnessController)
//! emits these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them; in this
//! firmware, print a status line on the serial console.

use super::state::{DutyCycle, PowerState};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started { state: PowerState, duty: DutyCycle },

    /// LEDs switched on.  `remembered` is the level captured at the last
    /// power-off, `duty` the level actually applied.
    PoweredOn { remembered: DutyCycle, duty: DutyCycle },

    /// LEDs switched off; `remembered` will be restored on the next press.
    PoweredOff { remembered: DutyCycle },

    /// Encoder moved the brightness while on.
    BrightnessChanged { duty: DutyCycle },

    /// Encoder events thrown away because the LEDs were off.
    StaleEventsDiscarded(usize),
}

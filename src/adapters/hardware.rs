//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the push-button sampler and the LED bank, exposing them through
//! [`ButtonPort`] and [`PwmPort`].  On non-espidf targets the underlying
//! drivers use cfg-gated simulation stubs.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{ButtonPort, PwmPort};
use crate::app::state::DutyCycle;
use crate::drivers::button::ButtonInput;
use crate::drivers::led_bank::LedBank;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, C> {
    button: ButtonInput<P>,
    leds: LedBank<C>,
}

impl<P: InputPin, C: SetDutyCycle> HardwareAdapter<P, C> {
    pub fn new(button: ButtonInput<P>, leds: LedBank<C>) -> Self {
        Self { button, leds }
    }

    pub fn leds(&self) -> &LedBank<C> {
        &self.leds
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<P: InputPin, C: SetDutyCycle> ButtonPort for HardwareAdapter<P, C> {
    fn is_pressed(&mut self) -> bool {
        self.button.is_pressed()
    }
}

// ── PwmPort implementation ────────────────────────────────────

impl<P: InputPin, C: SetDutyCycle> PwmPort for HardwareAdapter<P, C> {
    fn apply_duty(&mut self, duty: DutyCycle) {
        self.leds.set(duty);
    }
}

//! Three-channel LED bank driven in lockstep.
//!
//! Converts a duty percentage into a compare level on the fixed
//! 1000-step PWM counter and writes the same level to every channel.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::pwm::SetDutyCycle`.  On ESP-IDF the
//! channels are [`PwmChannel`]s backed by MCPWM comparators; on host/test
//! anything implementing the trait can be plugged in.

use embedded_hal::pwm::{Error as _, ErrorType, SetDutyCycle};
use log::warn;

use crate::app::state::DutyCycle;
use crate::drivers::hw_init;
use crate::error::PwmError;
use crate::pins;

/// Compare level for `duty`: `floor(PWM_RESOLUTION * percent / 100)`.
pub fn compare_level(duty: DutyCycle) -> u16 {
    (pins::PWM_RESOLUTION * u32::from(duty.percent()) / 100) as u16
}

pub struct LedBank<C> {
    channels: [C; pins::LED_CHANNELS],
    level: u16,
}

impl<C: SetDutyCycle> LedBank<C> {
    pub fn new(channels: [C; pins::LED_CHANNELS]) -> Self {
        Self { channels, level: 0 }
    }

    /// Write `duty` to all channels.  A failing channel is logged and the
    /// others are still written.
    pub fn set(&mut self, duty: DutyCycle) {
        let level = compare_level(duty);
        for (i, ch) in self.channels.iter_mut().enumerate() {
            if let Err(e) = ch.set_duty_cycle(level) {
                warn!("led_bank: channel {} write failed ({:?})", i, e.kind());
            }
        }
        self.level = level;
    }

    /// Compare level last written.
    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn channels(&self) -> &[C; pins::LED_CHANNELS] {
        &self.channels
    }
}

// ── MCPWM channel ─────────────────────────────────────────────

/// One LED output on the MCPWM peripheral, by channel index.
#[derive(Debug)]
pub struct PwmChannel {
    index: usize,
}

impl PwmChannel {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// The full lockstep set, in `pins::LED_GPIOS` order.
    pub fn all() -> [Self; pins::LED_CHANNELS] {
        core::array::from_fn(Self::new)
    }
}

impl ErrorType for PwmChannel {
    type Error = PwmError;
}

impl SetDutyCycle for PwmChannel {
    fn max_duty_cycle(&self) -> u16 {
        pins::PWM_RESOLUTION as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if duty > self.max_duty_cycle() {
            return Err(PwmError::OutOfRange(duty));
        }
        hw_init::pwm_set_compare(self.index, duty)
    }
}

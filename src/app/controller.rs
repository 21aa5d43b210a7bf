//! Brightness controller — the hexagonal core.
//!
//! [`BrightnessController`] is the sole owner of the power state, the
//! current duty cycle and the remembered brightness.  It consumes encoder
//! levels from the ISR queue and debounced push-button verdicts, and
//! drives the LED bank through [`PwmPort`].
//!
//! ```text
//!  ButtonPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │  BrightnessController  │
//!  EncoderRx  ──▶ │  OFF ⇄ ON · remember   │ ──▶ PwmPort
//!                 └────────────────────────┘
//! ```
//!
//! ## Main-loop iteration
//!
//! 1. ON: take at most one queued level and apply it.
//!    OFF: queued levels never reach the LEDs (see [`StaleEventPolicy`]).
//! 2. Debounce the push-button (blocks ≥ 30 ms).
//! 3. On PRESSED: toggle, then wait for release before sampling again.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::{ControllerConfig, StaleEventPolicy};
use crate::drivers::button::Debouncer;
use crate::events::EncoderRx;

use super::events::AppEvent;
use super::ports::{ButtonPort, EventSink, PwmPort};
use super::state::{ButtonVerdict, DutyCycle, PowerState};

// ───────────────────────────────────────────────────────────────
// BrightnessController
// ───────────────────────────────────────────────────────────────

pub struct BrightnessController<'a> {
    config: ControllerConfig,
    encoder: EncoderRx<'a>,
    debouncer: Debouncer,
    power: PowerState,
    duty: DutyCycle,
    /// Level captured at the last ON → OFF transition.
    remembered: DutyCycle,
    iterations: u64,
}

impl<'a> BrightnessController<'a> {
    /// Construct the controller, OFF at 0 %.
    ///
    /// Does **not** touch the LEDs; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig, encoder: EncoderRx<'a>) -> Self {
        let debouncer = Debouncer::new(config.debounce_threshold);
        Self {
            config,
            encoder,
            debouncer,
            power: PowerState::Off,
            duty: DutyCycle::OFF,
            remembered: DutyCycle::OFF,
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the LEDs dark and align the encoder with the initial level.
    pub fn start(&mut self, pwm: &mut impl PwmPort, sink: &mut impl EventSink) {
        self.encoder.resync(self.duty);
        pwm.apply_duty(self.duty);
        sink.emit(&AppEvent::Started {
            state: self.power,
            duty: self.duty,
        });
        info!("BrightnessController started {:?} at {}", self.power, self.duty);
    }

    /// One main-loop iteration.  Blocks for at least one debounce window,
    /// and for as long as the button is held after a toggle.
    pub fn run_once(
        &mut self,
        hw: &mut (impl ButtonPort + PwmPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.iterations += 1;

        self.service_encoder(hw, sink);

        let verdict = self.debouncer.settle(
            || hw.is_pressed(),
            delay,
            self.config.debounce_interval_ms,
        );

        if verdict == ButtonVerdict::Pressed {
            self.toggle(hw, sink);
            self.wait_for_release(hw, delay);
        }
    }

    // ── Transitions ───────────────────────────────────────────

    /// Flip the power state and apply the resulting level.
    pub fn toggle(&mut self, pwm: &mut impl PwmPort, sink: &mut impl EventSink) {
        match self.power.toggled() {
            PowerState::On => self.power_on(pwm, sink),
            PowerState::Off => self.power_off(pwm, sink),
        }
    }

    fn power_on(&mut self, pwm: &mut impl PwmPort, sink: &mut impl EventSink) {
        let restored = if self.remembered.is_off() {
            self.config.fallback_brightness_percent
        } else {
            self.remembered
        };

        // Re-seed before draining: an edge landing after the drain must
        // step from the restored level, not from what was counted while off.
        self.encoder.resync(restored);
        if self.config.stale_encoder_events == StaleEventPolicy::Discard {
            self.discard_stale(sink);
        }

        self.power = PowerState::On;
        self.duty = restored;
        pwm.apply_duty(restored);
        sink.emit(&AppEvent::PoweredOn {
            remembered: self.remembered,
            duty: restored,
        });
    }

    fn power_off(&mut self, pwm: &mut impl PwmPort, sink: &mut impl EventSink) {
        self.remembered = self.duty;
        self.duty = DutyCycle::OFF;
        self.power = PowerState::Off;
        self.encoder.resync(DutyCycle::OFF);
        pwm.apply_duty(DutyCycle::OFF);
        sink.emit(&AppEvent::PoweredOff {
            remembered: self.remembered,
        });
    }

    // ── Internal ──────────────────────────────────────────────

    fn service_encoder(&mut self, pwm: &mut impl PwmPort, sink: &mut impl EventSink) {
        match self.power {
            PowerState::On => {
                if let Some(level) = self.encoder.try_take() {
                    self.duty = level;
                    pwm.apply_duty(level);
                    sink.emit(&AppEvent::BrightnessChanged { duty: level });
                }
            }
            PowerState::Off => {
                if self.config.stale_encoder_events == StaleEventPolicy::Discard {
                    self.discard_stale(sink);
                }
            }
        }
    }

    fn discard_stale(&mut self, sink: &mut impl EventSink) {
        let dropped = self.encoder.discard_pending();
        if dropped > 0 {
            sink.emit(&AppEvent::StaleEventsDiscarded(dropped));
        }
    }

    /// Hold-off: one toggle per physical press, however long it is held.
    fn wait_for_release(&mut self, button: &mut impl ButtonPort, delay: &mut impl DelayNs) {
        let mut polls: u32 = 0;
        while button.is_pressed() {
            delay.delay_ms(self.config.release_poll_ms);
            polls += 1;
        }
        debug!("button released after {} hold poll(s)", polls);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Level currently on the LEDs (0 % while off).
    pub fn duty(&self) -> DutyCycle {
        self.duty
    }

    /// Level captured at the last power-off, as captured (may be 0 %).
    pub fn remembered(&self) -> DutyCycle {
        self.remembered
    }

    /// Main-loop iterations run since startup.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

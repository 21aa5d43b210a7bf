//! Encoder shaft push-button: raw sampler and counter-based debounce filter.
//!
//! ## Hardware
//!
//! Momentary switch to ground with the internal pull-up enabled, so the
//! line reads LOW while held.  Polarity is a config flag
//! ([`ControllerConfig::button_active_low`](crate::config::ControllerConfig))
//! resolved here; everything above this module only sees "pressed".
//!
//! ## Debounce policy
//!
//! | Sample        | `press`  | `release` |
//! |---------------|----------|-----------|
//! | raw pressed   | += 1     | = 0       |
//! | raw released  | = 0      | += 1      |
//!
//! A verdict is reached when either counter hits the threshold (3 samples
//! at 10 ms by default).  Until then the filter keeps sampling.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, InputPin};
use log::warn;

use crate::app::state::ButtonVerdict;

// ── Input sampler ─────────────────────────────────────────────

/// Raw push-button reader over any `embedded-hal` input pin.
pub struct ButtonInput<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> ButtonInput<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Instantaneous pressed reading.  A failed pin read counts as released.
    pub fn is_pressed(&mut self) -> bool {
        let level = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };
        level.unwrap_or_else(|e| {
            warn!("button: pin read failed ({:?}), treating as released", e.kind());
            false
        })
    }
}

// ── Debounce filter ───────────────────────────────────────────

/// Consecutive-sample debounce counter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    press: u8,
    release: u8,
    threshold: u8,
}

impl Debouncer {
    pub fn new(threshold: u8) -> Self {
        Self {
            press: 0,
            release: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feed one raw sample.  Returns a verdict once a run of `threshold`
    /// consistent samples has been seen.
    pub fn sample(&mut self, raw_pressed: bool) -> Option<ButtonVerdict> {
        if raw_pressed {
            self.press = self.press.saturating_add(1);
            self.release = 0;
        } else {
            self.release = self.release.saturating_add(1);
            self.press = 0;
        }

        if self.press >= self.threshold {
            Some(ButtonVerdict::Pressed)
        } else if self.release >= self.threshold {
            Some(ButtonVerdict::Released)
        } else {
            None
        }
    }

    /// Clear both counters.
    pub fn reset(&mut self) {
        self.press = 0;
        self.release = 0;
    }

    /// Sample `raw_pressed` every `interval_ms` until the verdict is stable.
    ///
    /// Blocks the caller; never returns while the input keeps bouncing.
    pub fn settle(
        &mut self,
        mut raw_pressed: impl FnMut() -> bool,
        delay: &mut impl DelayNs,
        interval_ms: u32,
    ) -> ButtonVerdict {
        self.reset();
        loop {
            let verdict = self.sample(raw_pressed());
            delay.delay_ms(interval_ms);
            if let Some(verdict) = verdict {
                return verdict;
            }
        }
    }
}

//! Domain value types shared by the controller, drivers and adapters.

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────
// DutyCycle
// ───────────────────────────────────────────────────────────────

/// LED brightness as a PWM duty percentage.
///
/// Always a multiple of [`DutyCycle::STEP`] within `0..=100`.  Stepping
/// past either bound is refused rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DutyCycle(u8);

impl DutyCycle {
    /// Encoder detent increment.
    pub const STEP: u8 = 5;
    pub const OFF: Self = Self(0);
    pub const FULL: Self = Self(100);
    /// Level used when restoring from a remembered brightness of zero.
    pub const FALLBACK: Self = Self(50);

    /// Exact constructor: `None` unless `percent` is an in-range multiple of 5.
    pub const fn new(percent: u8) -> Option<Self> {
        if percent <= Self::FULL.0 && percent % Self::STEP == 0 {
            Some(Self(percent))
        } else {
            None
        }
    }

    /// Clamp to 100 and round down onto the 5 % grid.
    pub const fn saturating(percent: u8) -> Self {
        let p = if percent > Self::FULL.0 { Self::FULL.0 } else { percent };
        Self(p - p % Self::STEP)
    }

    pub const fn percent(self) -> u8 {
        self.0
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }

    /// One detent brighter, or `None` when already at 100 %.
    pub const fn step_up(self) -> Option<Self> {
        if self.0 >= Self::FULL.0 {
            None
        } else {
            Some(Self(self.0 + Self::STEP))
        }
    }

    /// One detent dimmer, or `None` when already at 0 %.
    pub const fn step_down(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(Self(self.0 - Self::STEP))
        }
    }
}

impl TryFrom<u8> for DutyCycle {
    type Error = &'static str;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::new(percent).ok_or("duty cycle must be a multiple of 5 in 0..=100")
    }
}

impl From<DutyCycle> for u8 {
    fn from(duty: DutyCycle) -> Self {
        duty.0
    }
}

impl core::fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// PowerState / ButtonVerdict
// ───────────────────────────────────────────────────────────────

/// Whether the LEDs are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// Stable push-button reading produced by the debounce filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVerdict {
    Pressed,
    Released,
}

//! Unified error types for the KnobDimmer firmware.
//!
//! The control path itself is infallible: out-of-range brightness clamps
//! and queue overflow drops.  A rejected config falls back to defaults and
//! a failed PWM write is logged by the LED bank.  Only bring-up failures
//! reach `main`, through [`Error`].

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// PWM channel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Compare level beyond the counter period.
    OutOfRange(u16),
    /// No comparator exists for this channel index.
    NoSuchChannel(usize),
    /// ESP-IDF returned a non-OK code.
    WriteFailed(i32),
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(level) => write!(f, "compare level {level} out of range"),
            Self::NoSuchChannel(idx) => write!(f, "no PWM channel {idx}"),
            Self::WriteFailed(rc) => write!(f, "compare write failed (rc={rc})"),
        }
    }
}

impl core::error::Error for PwmError {}

impl embedded_hal::pwm::Error for PwmError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

//! Quadrature encoder event source.
//!
//! ## Hardware
//!
//! Mechanical detent encoder, lines A and B.  The GPIO ISR fires on the
//! rising edge of A; the level of B at that instant gives the direction:
//!
//! | B at A↑ | Direction         | Brightness |
//! |---------|-------------------|------------|
//! | LOW     | clockwise         | +5 %       |
//! | HIGH    | counter-clockwise | −5 %       |
//!
//! Runs in interrupt context: no logging, no blocking, one attempted
//! enqueue per edge.

use crate::app::state::DutyCycle;
use crate::events::EncoderTx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Decode direction from line B sampled on the A rising edge.
    pub fn from_b_level(b_high: bool) -> Self {
        if b_high {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }
}

/// ISR-side brightness stepper.
#[derive(Clone, Copy)]
pub struct EncoderSource<'a> {
    tx: EncoderTx<'a>,
}

impl<'a> EncoderSource<'a> {
    pub const fn new(tx: EncoderTx<'a>) -> Self {
        Self { tx }
    }

    /// Handle one rising edge on line A.
    ///
    /// Returns the level that was queued.  `None` when the step hit a
    /// bound (nothing queued) or the queue was full (newest dropped).
    pub fn on_a_rising(&self, b_high: bool) -> Option<DutyCycle> {
        let step = match Direction::from_b_level(b_high) {
            Direction::Clockwise => DutyCycle::step_up,
            Direction::CounterClockwise => DutyCycle::step_down,
        };
        let level = self.tx.advance(step)?;
        self.tx.publish(level).then_some(level)
    }
}

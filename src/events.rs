//! Interrupt-driven encoder event queue.
//!
//! Events are produced by the encoder line-A GPIO ISR and consumed by the
//! main control loop, at most one per loop iteration.
//!
//! ```text
//! ┌──────────────┐  try_send   ┌──────────────┐  try_receive ┌──────────────┐
//! │ Encoder ISR  │────────────▶│ bounded (100)│─────────────▶│  Main Loop   │
//! │ (producer)   │             │   channel    │              │  (consumer)  │
//! └──────────────┘             └──────────────┘              └──────────────┘
//!        ▲ tracked level                                          │
//!        └──────────────────────── resync on toggle ──────────────┘
//! ```
//!
//! The ISR never sees the controller's duty cycle.  It keeps its own
//! *tracked level* (the value it last published) and steps from there.
//! The controller re-seeds that level whenever it toggles power, so the
//! next detent steps from what the LEDs actually show.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::state::DutyCycle;

/// Maximum number of pending encoder events.
pub const ENCODER_QUEUE_CAP: usize = 100;

/// Shared state between the encoder ISR and the main loop.
pub struct EncoderLink {
    queue: Channel<CriticalSectionRawMutex, DutyCycle, ENCODER_QUEUE_CAP>,
    tracked: AtomicU8,
}

/// The board-wide link.  A static because the GPIO ISR has no context
/// pointer back into `main`.
pub static ENCODER_LINK: EncoderLink = EncoderLink::new();

impl EncoderLink {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            tracked: AtomicU8::new(0),
        }
    }

    /// Producer half, for interrupt context.
    pub const fn tx(&self) -> EncoderTx<'_> {
        EncoderTx { link: self }
    }

    /// Consumer half, for the main loop.
    pub const fn rx(&self) -> EncoderRx<'_> {
        EncoderRx { link: self }
    }
}

impl Default for EncoderLink {
    fn default() -> Self {
        Self::new()
    }
}

// ── Producer ──────────────────────────────────────────────────

/// ISR-side handle.  Never blocks.
#[derive(Clone, Copy)]
pub struct EncoderTx<'a> {
    link: &'a EncoderLink,
}

impl EncoderTx<'_> {
    /// Atomically move the tracked level with `step`.  Returns the new
    /// level, or `None` (level untouched) when `step` refuses at a bound.
    pub fn advance(&self, step: impl Fn(DutyCycle) -> Option<DutyCycle>) -> Option<DutyCycle> {
        self.link
            .tracked
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                step(DutyCycle::saturating(raw)).map(DutyCycle::percent)
            })
            .ok()
            .map(|prev| {
                // fetch_update hands back the previous value; re-apply the
                // (pure) step to report the stored one.
                step(DutyCycle::saturating(prev)).unwrap_or(DutyCycle::saturating(prev))
            })
    }

    /// Queue `duty` for the main loop.  Returns `false` if the queue is
    /// full (event dropped).
    pub fn publish(&self, duty: DutyCycle) -> bool {
        self.link.queue.try_send(duty).is_ok()
    }
}

// ── Consumer ──────────────────────────────────────────────────

/// Main-loop handle.
#[derive(Clone, Copy)]
pub struct EncoderRx<'a> {
    link: &'a EncoderLink,
}

impl EncoderRx<'_> {
    /// Pop the oldest pending level, if any.
    pub fn try_take(&self) -> Option<DutyCycle> {
        self.link.queue.try_receive().ok()
    }

    /// Drop everything pending.  Returns how many entries were removed.
    pub fn discard_pending(&self) -> usize {
        let mut dropped = 0;
        while self.try_take().is_some() {
            dropped += 1;
        }
        dropped
    }

    /// Re-seed the level the ISR steps from.
    pub fn resync(&self, duty: DutyCycle) {
        self.link.tracked.store(duty.percent(), Ordering::Release);
    }

    /// Level the ISR will step from on the next detent.
    pub fn tracked(&self) -> DutyCycle {
        DutyCycle::saturating(self.link.tracked.load(Ordering::Acquire))
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.link.queue.len()
    }
}

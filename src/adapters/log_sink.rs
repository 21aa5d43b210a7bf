//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (which goes to UART / USB-CDC in production).  These are the
//! console status lines; nothing functional depends on them.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state, duty } => {
                info!("START | power={:?} | duty={}", state, duty);
            }
            AppEvent::PoweredOn { remembered, duty } => {
                info!(
                    "POWER | on | brightness level is {} & duty cycle turned on {}",
                    remembered, duty
                );
            }
            AppEvent::PoweredOff { remembered } => {
                info!("POWER | off | button pressed, lights off (remembering {})", remembered);
            }
            AppEvent::BrightnessChanged { duty } => {
                info!("LEVEL | duty={}", duty);
            }
            AppEvent::StaleEventsDiscarded(n) => {
                debug!("QUEUE | discarded {} encoder event(s) while off", n);
            }
        }
    }
}

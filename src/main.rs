//! KnobDimmer Firmware — Main Entry Point
//!
//! Hexagonal architecture: a single brightness controller fed by a
//! debounced push-button and an interrupt-driven encoder queue.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter (ButtonPort + PwmPort)   LogEventSink         │
//! │  Encoder ISR ──▶ ENCODER_LINK (bounded channel)                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         BrightnessController (pure logic)              │    │
//! │  │  OFF ⇄ ON · remembered brightness · debounce           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info, warn};

use knobdimmer::adapters::hardware::HardwareAdapter;
use knobdimmer::adapters::log_sink::LogEventSink;
use knobdimmer::app::controller::BrightnessController;
use knobdimmer::config::ControllerConfig;
use knobdimmer::drivers::button::ButtonInput;
use knobdimmer::drivers::hw_init::{self, GpioInput};
use knobdimmer::drivers::led_bank::{LedBank, PwmChannel};
use knobdimmer::events::ENCODER_LINK;
use knobdimmer::pins;

/// Baked-in config, validated at boot.  Falls back to defaults when the
/// override is absent or rejected.
fn load_config() -> ControllerConfig {
    match option_env!("KNOBDIMMER_CONFIG") {
        Some(json) => match ControllerConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config: build-time override applied");
                cfg
            }
            Err(e) => {
                warn!("Config: build-time override rejected ({}), using defaults", e);
                ControllerConfig::default()
            }
        },
        None => ControllerConfig::default(),
    }
}

/// Peripheral bring-up.  Any failure here is fatal.
fn bring_up() -> knobdimmer::error::Result<()> {
    hw_init::init_peripherals()?;
    hw_init::init_isr_service()?;
    Ok(())
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  KnobDimmer v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = bring_up() {
        error!("Bring-up failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Config ─────────────────────────────────────────────
    let config = load_config();

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        ButtonInput::new(GpioInput::new(pins::ROT_SW_GPIO), config.button_active_low),
        LedBank::new(PwmChannel::all()),
    );
    let mut log_sink = LogEventSink::new();
    let mut delay = FreeRtos;

    // ── 5. Controller ─────────────────────────────────────────
    let mut controller = BrightnessController::new(config, ENCODER_LINK.rx());
    controller.start(&mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        controller.run_once(&mut hw, &mut delay, &mut log_sink);
    }
}

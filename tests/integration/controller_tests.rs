//! Integration: push-button + encoder queue → BrightnessController → LEDs.

use knobdimmer::app::controller::BrightnessController;
use knobdimmer::app::events::AppEvent;
use knobdimmer::app::ports::EventSink;
use knobdimmer::app::state::{DutyCycle, PowerState};
use knobdimmer::config::{ControllerConfig, StaleEventPolicy};
use knobdimmer::drivers::encoder::EncoderSource;
use knobdimmer::events::EncoderLink;

use crate::mock_hw::{MockDelay, MockHardware, RecordingSink};

const CW: bool = false; // B low on A rising
const CCW: bool = true;

fn pct(p: u8) -> DutyCycle {
    DutyCycle::new(p).unwrap()
}

struct Rig<'a> {
    ctl: BrightnessController<'a>,
    hw: MockHardware,
    delay: MockDelay,
    sink: RecordingSink,
}

impl<'a> Rig<'a> {
    fn new(link: &'a EncoderLink, config: ControllerConfig) -> Self {
        let mut rig = Self {
            ctl: BrightnessController::new(config, link.rx()),
            hw: MockHardware::new(),
            delay: MockDelay::new(),
            sink: RecordingSink::new(),
        };
        rig.ctl.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn step(&mut self) {
        self.ctl.run_once(&mut self.hw, &mut self.delay, &mut self.sink);
    }

    fn click(&mut self) {
        self.hw.press(3);
        self.step();
    }

    fn idle(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }
}

#[test]
fn press_turns_on_at_fallback_and_waits_for_release() {
    let link = EncoderLink::new();
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.hw.press(3 + 10);
    rig.step();

    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.hw.applied, vec![DutyCycle::OFF, pct(50)]);
    // 3 debounce samples at 10 ms, then 10 held polls at 50 ms.
    assert_eq!(rig.delay.elapsed_ms(), 30 + 10 * 50);
    assert!(rig.hw.script_exhausted());
    // The release is seen on the first sample past the script.
    assert_eq!(rig.hw.samples, 3 + 10 + 1);
}

#[test]
fn long_hold_toggles_exactly_once() {
    let link = EncoderLink::new();
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.hw.press(3 + 1_000);
    rig.idle(5);

    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PoweredOn { .. })), 1);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PoweredOff { .. })), 0);
    assert_eq!(rig.ctl.iterations(), 5);
}

#[test]
fn bouncing_contact_still_gives_one_toggle() {
    let link = EncoderLink::new();
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.hw.script([true, false, true, false, true, true, true, true]);
    rig.idle(3);

    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::PoweredOn { .. })), 1);
}

#[test]
fn released_button_never_toggles() {
    let link = EncoderLink::new();
    let mut rig = Rig::new(&link, ControllerConfig::default());
    rig.idle(20);
    assert_eq!(rig.ctl.power(), PowerState::Off);
    assert_eq!(rig.hw.applied, vec![DutyCycle::OFF]);
    assert_eq!(rig.delay.elapsed_ms(), 20 * 30);
}

#[test]
fn seventy_percent_survives_off_on() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.click(); // ON at 50
    for _ in 0..4 {
        enc.on_a_rising(CW);
    }
    rig.idle(4);
    assert_eq!(rig.ctl.duty(), pct(70));
    assert_eq!(rig.hw.last_applied(), Some(pct(70)));

    rig.click();
    assert_eq!(rig.ctl.power(), PowerState::Off);
    assert_eq!(rig.ctl.duty(), DutyCycle::OFF);
    assert_eq!(rig.ctl.remembered(), pct(70));
    assert_eq!(rig.hw.last_applied(), Some(DutyCycle::OFF));

    rig.click();
    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.ctl.duty(), pct(70));
    assert_eq!(rig.hw.last_applied(), Some(pct(70)));
}

#[test]
fn dimmed_to_zero_restores_fifty() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.click(); // ON at 50
    for _ in 0..10 {
        assert!(enc.on_a_rising(CCW).is_some());
    }
    assert_eq!(enc.on_a_rising(CCW), None); // floor reached, dropped
    rig.idle(10);
    assert_eq!(rig.ctl.duty(), DutyCycle::OFF);
    assert_eq!(rig.ctl.power(), PowerState::On);

    rig.click();
    assert_eq!(rig.ctl.power(), PowerState::Off);
    assert_eq!(rig.ctl.remembered(), DutyCycle::OFF);

    rig.click();
    assert_eq!(rig.ctl.duty(), pct(50));
    assert_eq!(rig.hw.last_applied(), Some(pct(50)));
}

#[test]
fn one_queued_level_per_iteration() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.click();
    for _ in 0..3 {
        enc.on_a_rising(CW);
    }
    rig.step();
    assert_eq!(rig.ctl.duty(), pct(55));
    assert_eq!(link.rx().pending(), 2);
    rig.idle(2);
    assert_eq!(rig.ctl.duty(), pct(65));
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::BrightnessChanged { .. })),
        3
    );
}

#[test]
fn turning_past_full_clamps() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.click();
    let queued = (0..20).filter_map(|_| enc.on_a_rising(CW)).count();
    assert_eq!(queued, 10);
    rig.idle(20);
    assert_eq!(rig.ctl.duty(), DutyCycle::FULL);
    assert_eq!(link.rx().pending(), 0);
}

#[test]
fn knob_while_off_keeps_leds_dark() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    for _ in 0..10 {
        enc.on_a_rising(CW);
    }
    assert_eq!(link.rx().pending(), 10);
    rig.idle(3);

    assert_eq!(link.rx().pending(), 0);
    assert_eq!(rig.hw.applied, vec![DutyCycle::OFF]);
    assert_eq!(rig.ctl.duty(), DutyCycle::OFF);
    assert!(rig.sink.events.contains(&AppEvent::StaleEventsDiscarded(10)));
}

#[test]
fn power_on_after_knob_while_off_has_no_catch_up() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    for _ in 0..10 {
        enc.on_a_rising(CW);
    }
    rig.click();
    assert_eq!(rig.ctl.duty(), pct(50));
    rig.idle(5);
    assert_eq!(rig.ctl.duty(), pct(50));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::BrightnessChanged { .. })), 0);

    // The next detent steps from what the LEDs show.
    assert_eq!(enc.on_a_rising(CW), Some(pct(55)));
}

#[test]
fn preserve_policy_replays_stale_levels_after_power_on() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let config = ControllerConfig {
        stale_encoder_events: StaleEventPolicy::Preserve,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::new(&link, config);

    for _ in 0..3 {
        enc.on_a_rising(CW);
    }
    rig.idle(2);
    assert_eq!(link.rx().pending(), 3);
    assert_eq!(rig.hw.applied, vec![DutyCycle::OFF]);

    rig.click();
    assert_eq!(rig.ctl.duty(), pct(50));
    rig.idle(3);
    assert_eq!(rig.ctl.duty(), pct(15));
    assert_eq!(rig.hw.applied[rig.hw.applied.len() - 3..], [pct(5), pct(10), pct(15)]);
}

#[test]
fn custom_timing_is_used_for_waits() {
    let link = EncoderLink::new();
    let config = ControllerConfig {
        debounce_interval_ms: 5,
        debounce_threshold: 4,
        release_poll_ms: 20,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::new(&link, config);

    rig.hw.press(4 + 2);
    rig.step();
    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.delay.elapsed_ms(), 4 * 5 + 2 * 20);
}

/// Fires one clockwise detent every time a drain is reported, the way an
/// A-edge interrupt can land in the middle of a power-on.
struct EdgeOnDrain<'a> {
    enc: EncoderSource<'a>,
    inner: RecordingSink,
}

impl EventSink for EdgeOnDrain<'_> {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::StaleEventsDiscarded(_) = event {
            self.enc.on_a_rising(CW);
        }
        self.inner.emit(event);
    }
}

#[test]
fn edge_during_power_on_steps_from_restored_level() {
    let link = EncoderLink::new();
    let enc = EncoderSource::new(link.tx());
    let mut rig = Rig::new(&link, ControllerConfig::default());

    rig.click(); // ON at 50
    for _ in 0..4 {
        enc.on_a_rising(CW);
    }
    rig.idle(4);
    rig.click(); // OFF, remembering 70
    assert_eq!(rig.ctl.remembered(), pct(70));

    // Knob turned while dark: the ISR tracker climbs to 30.
    for _ in 0..6 {
        enc.on_a_rising(CW);
    }
    assert_eq!(link.rx().tracked(), pct(30));

    let mut sink = EdgeOnDrain { enc, inner: RecordingSink::new() };
    rig.hw.press(3);
    rig.ctl.run_once(&mut rig.hw, &mut rig.delay, &mut sink);
    assert_eq!(rig.ctl.power(), PowerState::On);
    assert_eq!(rig.ctl.duty(), pct(70));

    rig.ctl.run_once(&mut rig.hw, &mut rig.delay, &mut sink);
    // The edge inside power-on counts one detent up from 70.
    assert_eq!(rig.ctl.duty(), pct(75));
    assert_eq!(rig.hw.applied[rig.hw.applied.len() - 2..], [pct(70), pct(75)]);
    assert_eq!(link.rx().pending(), 0);
}

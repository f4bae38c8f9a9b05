//! Integration tests for rgb-macropad host-testable logic.
//!
//! Each test drives a [`Macropad`] with a virtual millisecond clock and
//! small recording fakes for the keypad and the USB transport.

use rgb_macropad::action::ReportCategory;
use rgb_macropad::config::{
    DIM_LED_DURATION_MS, FLASH_RESET_MS, LOCK_ACTIVE_COLOR, MAX_BRIGHTNESS, MIN_BRIGHTNESS,
    NUM_KEYS, POLL_INTERVAL_MS,
};
use rgb_macropad::emitter::HidTransport;
use rgb_macropad::hid::keyboard::KEY_CAPS_LOCK;
use rgb_macropad::hid::{classify_report, HidReport, LockIndicators, REPORT_ID_CONSUMER_CONTROL};
use rgb_macropad::keymap;
use rgb_macropad::keypad::Keypad;
use rgb_macropad::{Error, Macropad, Rgb, Timing};

// Fakes

#[derive(Default)]
struct FakeKeypad {
    buttons: u16,
    brightness: f32,
    leds: [Rgb; NUM_KEYS],
    /// Every committed (brightness, colours) frame.
    frames: Vec<(f32, [Rgb; NUM_KEYS])>,
}

impl Keypad for FakeKeypad {
    fn init(&mut self) -> Result<(), Error> {
        self.leds = [Rgb::OFF; NUM_KEYS];
        self.update()
    }

    fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness;
    }

    fn illuminate(&mut self, index: usize, color: Rgb) {
        self.leds[index] = color;
    }

    fn update(&mut self) -> Result<(), Error> {
        self.frames.push((self.brightness, self.leds));
        Ok(())
    }

    fn button_states(&mut self) -> Result<u16, Error> {
        Ok(self.buttons)
    }
}

/// Transport that decodes what it is given back into typed reports.
struct FakeHost {
    ready: bool,
    reports: Vec<(u8, Vec<u8>)>,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            ready: true,
            reports: Vec::new(),
        }
    }

    fn decoded(&self) -> Vec<HidReport> {
        self.reports
            .iter()
            .map(|(id, data)| classify_report(*id, data).expect("well-formed report"))
            .collect()
    }
}

impl HidTransport for FakeHost {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn is_suspended(&self) -> bool {
        false
    }

    fn request_remote_wakeup(&mut self) {}

    fn send_keyboard_report(&mut self, modifier: u8, keycodes: [u8; 6]) -> Result<(), Error> {
        let mut data = vec![modifier, 0];
        data.extend_from_slice(&keycodes);
        self.reports.push((1, data));
        Ok(())
    }

    fn send_raw_report(&mut self, report_id: u8, data: &[u8]) -> Result<(), Error> {
        self.reports.push((report_id, data.to_vec()));
        Ok(())
    }
}

type Pad = Macropad<FakeKeypad, FakeHost>;

fn new_pad() -> Pad {
    Macropad::new(FakeKeypad::default(), FakeHost::new(), Timing::default(), 0)
}

/// Run poll ticks from `*now` up to and including `until`, one per interval.
fn run_until(pad: &mut Pad, now: &mut u32, until: u32) {
    while *now < until {
        *now += POLL_INTERVAL_MS;
        let _ = pad.poll(*now);
    }
}

fn hold(pad: &mut Pad, mask: u16) {
    pad.keypad_mut().buttons = mask;
}

// Scenarios

#[test]
fn play_pause_press_then_release() {
    let mut pad = new_pad();
    pad.configure(
        2,
        Rgb::new(0x20, 0x05, 0x20),
        0xCD,
        0,
        ReportCategory::ConsumerControl,
    );
    let mut now = 0;

    hold(&mut pad, 1 << 2);
    run_until(&mut pad, &mut now, 10);
    assert_eq!(pad.transport().reports, vec![(REPORT_ID_CONSUMER_CONTROL, vec![0xCD, 0x00])]);
    assert!(pad.report_flags().consumer_key_held);

    hold(&mut pad, 0);
    run_until(&mut pad, &mut now, 20);
    assert_eq!(pad.transport().reports.len(), 2);
    assert_eq!(pad.transport().reports[1], (REPORT_ID_CONSUMER_CONTROL, vec![0x00, 0x00]));
    assert!(!pad.report_flags().consumer_key_held);

    match pad.transport().decoded()[0] {
        HidReport::Consumer(c) => assert_eq!(c.usage, 0xCD),
        other => panic!("expected consumer report, got {:?}", other),
    }
}

#[test]
fn burst_of_presses_repaints_once() {
    let mut pad = new_pad();
    let bindings = keymap::default_keymap();
    keymap::apply(&mut pad, &bindings);
    let mut now = 0;

    // Key 0, release tick, key 1: both within the flash window.
    hold(&mut pad, 1 << 0);
    run_until(&mut pad, &mut now, 10);
    hold(&mut pad, 0);
    run_until(&mut pad, &mut now, 30);
    hold(&mut pad, 1 << 1);
    run_until(&mut pad, &mut now, 50);
    hold(&mut pad, 0);

    let frames_before = pad.keypad().frames.len();
    run_until(&mut pad, &mut now, 10 + FLASH_RESET_MS + 500);

    let repaints: Vec<_> = pad.keypad().frames[frames_before..]
        .iter()
        .filter(|(_, leds)| leds.iter().zip(&bindings).all(|(led, a)| *led == a.color))
        .collect();
    assert_eq!(repaints.len(), 1);
    assert_eq!(pad.keypad().frames.len(), frames_before + 1);
    assert!(!pad.timer_state().flash_timer_pending);
}

#[test]
fn inactivity_dims_once_and_press_restores() {
    let mut pad = new_pad();
    pad.configure(1, Rgb::new(0, 0x20, 0), 0x52, 0x01, ReportCategory::Keyboard);
    let mut now = 0;

    run_until(&mut pad, &mut now, DIM_LED_DURATION_MS + 10 * POLL_INTERVAL_MS);
    let dims: Vec<_> = pad
        .keypad()
        .frames
        .iter()
        .filter(|(b, _)| *b == MIN_BRIGHTNESS)
        .collect();
    assert_eq!(dims.len(), 1);
    assert_eq!(pad.brightness(), MIN_BRIGHTNESS);
    assert!(!pad.timer_state().dim_timer_active);

    hold(&mut pad, 1 << 1);
    let next_tick = now + POLL_INTERVAL_MS;
    run_until(&mut pad, &mut now, next_tick);
    assert_eq!(pad.brightness(), MAX_BRIGHTNESS);
    assert!(pad.timer_state().dim_timer_active);
    assert_eq!(pad.keypad().brightness, MAX_BRIGHTNESS);

    // Re-armed with the full duration from the press.
    let pressed_at = now;
    hold(&mut pad, 0);
    run_until(&mut pad, &mut now, pressed_at + DIM_LED_DURATION_MS - POLL_INTERVAL_MS);
    assert_eq!(pad.brightness(), MAX_BRIGHTNESS);
    run_until(&mut pad, &mut now, pressed_at + DIM_LED_DURATION_MS);
    assert_eq!(pad.brightness(), MIN_BRIGHTNESS);
}

#[test]
fn caps_lock_indicator_follows_host() {
    let mut pad = new_pad();
    let original = Rgb::new(0, 0, 0x20);
    pad.configure(12, original, KEY_CAPS_LOCK, 0, ReportCategory::Keyboard);

    pad.set_lock_indicators(LockIndicators::from_bits(LockIndicators::CAPS_LOCK));
    assert_eq!(pad.led_color(12), LOCK_ACTIVE_COLOR);
    assert_eq!(pad.keypad().leds[12], LOCK_ACTIVE_COLOR);

    pad.set_lock_indicators(LockIndicators::from_bits(0));
    assert_eq!(pad.led_color(12), original);
    assert_eq!(pad.keypad().leds[12], original);
}

#[test]
fn lock_state_survives_flash_reset() {
    let mut pad = new_pad();
    pad.configure(12, Rgb::OFF, KEY_CAPS_LOCK, 0, ReportCategory::Keyboard);
    pad.configure(3, Rgb::new(0x20, 0, 0), 0x62, 0x05, ReportCategory::Keyboard);
    pad.set_lock_indicators(LockIndicators::from_bits(LockIndicators::CAPS_LOCK));
    let mut now = 0;

    hold(&mut pad, 1 << 3);
    run_until(&mut pad, &mut now, 10);
    hold(&mut pad, 0);
    run_until(&mut pad, &mut now, 10 + FLASH_RESET_MS);

    assert_eq!(pad.led_color(12), LOCK_ACTIVE_COLOR);
}

#[test]
fn removed_caps_key_is_not_repainted() {
    let mut pad = new_pad();
    pad.configure(12, Rgb::new(0, 0, 0x20), KEY_CAPS_LOCK, 0, ReportCategory::Keyboard);
    pad.remove(12);
    assert!(pad.actions().get(12).is_none());
    assert_eq!(pad.led_color(12), Rgb::OFF);

    let frames = pad.keypad().frames.len();
    pad.set_lock_indicators(LockIndicators::from_bits(LockIndicators::CAPS_LOCK));
    assert_eq!(pad.led_color(12), Rgb::OFF);
    // The sync still commits once, with key 12 untouched.
    assert_eq!(pad.keypad().frames.len(), frames + 1);
    assert_eq!(pad.keypad().leds[12], Rgb::OFF);
}

#[test]
fn unchanged_mask_fires_once() {
    let mut pad = new_pad();
    pad.configure(5, Rgb::new(0, 0x20, 0), 0x51, 0x01, ReportCategory::Keyboard);
    let mut now = 0;

    hold(&mut pad, 1 << 5);
    run_until(&mut pad, &mut now, 200);

    // One press and its release; holding the key does not repeat.
    let reports = pad.transport().decoded();
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0], HidReport::Keyboard(k) if k.keycodes[0] == 0x51 && k.modifier == 0x01));
    assert!(reports[1].is_release());
}

#[test]
fn highest_key_wins_for_chords() {
    let mut pad = new_pad();
    keymap::apply(&mut pad, &keymap::default_keymap());
    let mut now = 0;

    // Keys 1 and 9 together: only key 9 (Hyper+A) is reported.
    hold(&mut pad, (1 << 1) | (1 << 9));
    run_until(&mut pad, &mut now, 10);
    match pad.transport().decoded()[..] {
        [HidReport::Keyboard(k)] => {
            assert_eq!(k.keycodes[0], 0x04);
            assert_eq!(k.modifier, 0x0F);
        }
        ref other => panic!("unexpected reports {:?}", other),
    }
}

#[test]
fn at_most_one_report_kind_held_per_tick() {
    let mut pad = new_pad();
    keymap::apply(&mut pad, &keymap::default_keymap());
    let mut now = 0;

    // Alternate keyboard and consumer keys without any release in between.
    let masks = [1 << 0, 1 << 2, 1 << 4, 1 << 6, 1 << 7, 1 << 15, 1 << 2];
    for mask in masks {
        hold(&mut pad, mask);
        for _ in 0..3 {
            now += POLL_INTERVAL_MS;
            let _ = pad.poll(now);
            let flags = pad.report_flags();
            assert!(!(flags.keyboard_key_held && flags.consumer_key_held));
        }
    }

    // Every press is directly followed by its own release.
    let reports = pad.transport().decoded();
    assert_eq!(reports.len(), masks.len() * 2);
    for pair in reports.chunks(2) {
        assert!(!pair[0].is_release());
        assert!(pair[1].is_release());
        assert_eq!(pair[0].report_id(), pair[1].report_id());
    }
}

#[test]
fn unready_host_drops_press_and_shows_error() {
    let mut pad = new_pad();
    keymap::apply(&mut pad, &keymap::default_keymap());
    pad.transport_mut().ready = false;
    let mut now = 0;

    hold(&mut pad, 1 << 0);
    run_until(&mut pad, &mut now, 10);
    assert!(pad.transport().reports.is_empty());
    assert!(pad.keypad().leds.iter().all(|c| *c == Rgb::new(0x20, 0, 0)));

    // Host comes up; the press is not replayed.
    pad.transport_mut().ready = true;
    run_until(&mut pad, &mut now, 10 + FLASH_RESET_MS);
    assert!(pad.transport().reports.is_empty());
    assert_eq!(pad.keypad().leds[0], Rgb::new(0, 0, 0x20));
}

#[test]
fn bootloader_key_requests_reset() {
    let mut pad = new_pad();
    keymap::apply(&mut pad, &keymap::default_keymap());

    hold(&mut pad, 1 << 11);
    assert_eq!(pad.poll(POLL_INTERVAL_MS), Some(rgb_macropad::Command::EnterBootloader));
    assert!(pad.transport().reports.is_empty());
    assert!(pad.keypad().leds.iter().all(|c| c.is_off()));
}

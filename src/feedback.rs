//! LED feedback state machine.
//!
//! Two one-shot timers drive the panel:
//!
//! - **Inactivity dim**: armed at start and re-armed on every press. When
//!   it fires the panel drops to [`MIN_BRIGHTNESS`]. The first press after
//!   that restores [`MAX_BRIGHTNESS`].
//! - **Flash reset**: armed by a highlighted press, repaints all 16 keys
//!   with their resting colours. Only one instance is pending at a time,
//!   so a burst of presses produces a single repaint.
//!
//! Each timer flag is written on one side only: arming sets it, firing
//! (or cancelling) clears it.

use crate::action::ActionTable;
use crate::color::Rgb;
use crate::config::{MAX_BRIGHTNESS, MIN_BRIGHTNESS, NUM_KEYS};
use crate::keypad::Keypad;
use crate::timer::OneShot;

/// Snapshot of both timer flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedbackTimerState {
    pub dim_timer_active: bool,
    pub flash_timer_pending: bool,
}

/// LED colour buffer plus the two feedback timers.
#[derive(Clone, Debug)]
pub struct LedFeedback {
    colors: [Rgb; NUM_KEYS],
    brightness: f32,
    dim_timer: OneShot,
    flash_timer: OneShot,
    dim_after_ms: u32,
    flash_reset_ms: u32,
}

impl LedFeedback {
    pub fn new(dim_after_ms: u32, flash_reset_ms: u32) -> Self {
        Self {
            colors: [Rgb::OFF; NUM_KEYS],
            brightness: MAX_BRIGHTNESS,
            dim_timer: OneShot::new(),
            flash_timer: OneShot::new(),
            dim_after_ms,
            flash_reset_ms,
        }
    }

    /// Full brightness and a fresh inactivity window.
    pub fn start<K: Keypad>(&mut self, keypad: &mut K, now_ms: u32) {
        self.set_brightness(keypad, MAX_BRIGHTNESS);
        self.dim_timer.arm(now_ms, self.dim_after_ms);
    }

    /// Buffer a colour for one key (not committed).
    pub fn paint<K: Keypad>(&mut self, keypad: &mut K, index: usize, color: Rgb) {
        self.colors[index] = color;
        keypad.illuminate(index, color);
    }

    /// Buffer the same colour on every key (not committed).
    pub fn paint_all<K: Keypad>(&mut self, keypad: &mut K, color: Rgb) {
        for index in 0..NUM_KEYS {
            self.paint(keypad, index, color);
        }
    }

    /// Push buffered colours and brightness to the LEDs.
    pub fn commit<K: Keypad>(&mut self, keypad: &mut K) {
        if let Err(_e) = keypad.update() {
            warn!("LED update failed: {}", _e);
        }
    }

    /// Register activity: undim if needed and restart the inactivity window.
    pub fn wake<K: Keypad>(&mut self, keypad: &mut K, now_ms: u32) {
        if self.dim_timer.is_armed() {
            self.dim_timer.cancel();
        } else {
            info!("LED: waking panel");
            self.set_brightness(keypad, MAX_BRIGHTNESS);
            self.commit(keypad);
        }
        self.dim_timer.arm(now_ms, self.dim_after_ms);
    }

    /// Arm the flash-reset repaint unless one is already pending.
    pub fn schedule_flash_reset(&mut self, now_ms: u32) {
        if !self.flash_timer.is_armed() {
            self.flash_timer.arm(now_ms, self.flash_reset_ms);
        }
    }

    /// Fire whichever timers have expired.
    pub fn poll<K: Keypad>(&mut self, keypad: &mut K, actions: &ActionTable, now_ms: u32) {
        if self.dim_timer.poll(now_ms) {
            info!("LED: dimming after inactivity");
            self.set_brightness(keypad, MIN_BRIGHTNESS);
            self.commit(keypad);
        }
        if self.flash_timer.poll(now_ms) {
            debug!("LED: restoring assigned colours");
            for index in 0..NUM_KEYS {
                self.paint(keypad, index, actions.assigned_color(index));
            }
            self.commit(keypad);
        }
    }

    pub fn timer_state(&self) -> FeedbackTimerState {
        FeedbackTimerState {
            dim_timer_active: self.dim_timer.is_armed(),
            flash_timer_pending: self.flash_timer.is_armed(),
        }
    }

    /// Colour currently buffered for a key.
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index]
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    fn set_brightness<K: Keypad>(&mut self, keypad: &mut K, brightness: f32) {
        self.brightness = brightness;
        keypad.set_brightness(brightness);
    }
}

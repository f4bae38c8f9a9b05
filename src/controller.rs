//! Macropad controller - the composition root of the firmware logic.
//!
//! [`Macropad`] owns every piece of mutable state (action table, sampler,
//! LED feedback, report emitter) plus the keypad and transport
//! collaborators. It is driven by repeatedly calling [`Macropad::poll`]
//! with a monotonic millisecond clock; everything else happens inside
//! that call, so there is exactly one writer for every field.
//!
//! Order of work inside one poll tick:
//!
//! 1. expired feedback timers fire (dim, flash reset)
//! 2. the tick is skipped unless a full poll interval has elapsed
//! 3. a suspended bus only gets a remote-wakeup request
//! 4. a held report is released, which ends the tick
//! 5. the button mask is sampled and at most one press is handled

use crate::action::{ActionDescriptor, ActionTable, ReportCategory};
use crate::color::Rgb;
use crate::config::{
    DIM_LED_DURATION_MS, ERROR_COLOR, FLASH_RESET_MS, HIGHLIGHT_COLOR, LOCK_ACTIVE_COLOR,
    POLL_INTERVAL_MS,
};
use crate::emitter::{HidTransport, PressOutcome, ReportEmitter, ReportOutstandingFlags};
use crate::feedback::{FeedbackTimerState, LedFeedback};
use crate::hid::{LockIndicators, LockRole};
use crate::keypad::Keypad;
use crate::sampler::InputSampler;

/// Durations driving the controller. `Default` uses the values from [`crate::config`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval_ms: u32,
    pub flash_reset_ms: u32,
    pub dim_after_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            flash_reset_ms: FLASH_RESET_MS,
            dim_after_ms: DIM_LED_DURATION_MS,
        }
    }
}

/// Request the firmware has to carry out outside the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Command {
    /// Reboot into the USB mass-storage bootloader.
    EnterBootloader,
}

pub struct Macropad<K, T> {
    keypad: K,
    transport: T,
    actions: ActionTable,
    sampler: InputSampler,
    feedback: LedFeedback,
    emitter: ReportEmitter,
    poll_interval_ms: u32,
    poll_window_start_ms: u32,
}

impl<K: Keypad, T: HidTransport> Macropad<K, T> {
    /// Blank the pad, go to full brightness and start the inactivity window.
    pub fn new(mut keypad: K, transport: T, timing: Timing, now_ms: u32) -> Self {
        if let Err(_e) = keypad.init() {
            warn!("keypad init failed: {}", _e);
        }
        let mut feedback = LedFeedback::new(timing.dim_after_ms, timing.flash_reset_ms);
        feedback.start(&mut keypad, now_ms);

        Self {
            keypad,
            transport,
            actions: ActionTable::new(),
            sampler: InputSampler::new(),
            feedback,
            emitter: ReportEmitter::new(),
            poll_interval_ms: timing.poll_interval_ms,
            poll_window_start_ms: now_ms,
        }
    }

    /// Bind an action to a key and show its colour right away.
    ///
    /// `key_index` must be below 16.
    pub fn configure(
        &mut self,
        key_index: u8,
        color: Rgb,
        key_code: u8,
        modifier_mask: u8,
        category: ReportCategory,
    ) {
        debug!(
            "configure key {}: code={:#x} mods={:#x} {}",
            key_index, key_code, modifier_mask, category
        );
        self.actions.set(ActionDescriptor::new(
            key_index,
            color,
            key_code,
            modifier_mask,
            category,
        ));
        self.feedback
            .paint(&mut self.keypad, usize::from(key_index), color);
        self.feedback.commit(&mut self.keypad);
    }

    /// Unbind a key and turn its LED off.
    ///
    /// `key_index` must be below 16.
    pub fn remove(&mut self, key_index: u8) {
        debug!("remove key {}", key_index);
        self.actions.clear(key_index);
        self.feedback
            .paint(&mut self.keypad, usize::from(key_index), Rgb::OFF);
        self.feedback.commit(&mut self.keypad);
    }

    /// Mirror the host's lock LEDs on the keys bound to them.
    pub fn set_lock_indicators(&mut self, indicators: LockIndicators) {
        info!("lock indicators: {:#x}", indicators.bits());
        for role in LockRole::ALL {
            let Some(binding) = self.actions.lock_binding(role) else {
                continue;
            };
            let color = if indicators.is_on(role) {
                LOCK_ACTIVE_COLOR
            } else {
                binding.original_color
            };
            self.actions.set_assigned_color(binding.key_index, color);
            self.feedback
                .paint(&mut self.keypad, usize::from(binding.key_index), color);
        }
        self.feedback.commit(&mut self.keypad);
    }

    /// Run one iteration of the main loop.
    pub fn poll(&mut self, now_ms: u32) -> Option<Command> {
        self.feedback.poll(&mut self.keypad, &self.actions, now_ms);

        if now_ms.wrapping_sub(self.poll_window_start_ms) < self.poll_interval_ms {
            return None;
        }
        self.poll_window_start_ms = self.poll_window_start_ms.wrapping_add(self.poll_interval_ms);

        if self.transport.is_suspended() {
            self.transport.request_remote_wakeup();
            return None;
        }

        if self.emitter.release(&mut self.transport) {
            return None;
        }

        let mask = match self.keypad.button_states() {
            Ok(mask) => mask,
            Err(_e) => {
                warn!("button read failed: {}", _e);
                return None;
            }
        };
        let key = self.sampler.sample(mask)?;
        self.handle_press(key, now_ms)
    }

    fn handle_press(&mut self, key: u8, now_ms: u32) -> Option<Command> {
        let action = self.actions.get(key).copied();
        let lock_key = action.and_then(|a| a.lock_role()).is_some();
        debug!("key {} pressed", key);

        self.feedback.wake(&mut self.keypad, now_ms);

        if action.is_some_and(|a| a.is_device_command()) {
            info!("key {}: entering bootloader", key);
            self.feedback.paint_all(&mut self.keypad, Rgb::OFF);
            self.feedback.commit(&mut self.keypad);
            return Some(Command::EnterBootloader);
        }

        if self.transport.is_ready() {
            if !lock_key {
                self.feedback
                    .paint(&mut self.keypad, usize::from(key), HIGHLIGHT_COLOR);
            }
            if let Some(action) = action {
                match self.emitter.press(&action, &mut self.transport) {
                    PressOutcome::Failed(_e) => warn!("key {}: report failed: {}", key, _e),
                    PressOutcome::Suppressed => debug!("key {}: other report still held", key),
                    PressOutcome::Sent | PressOutcome::NoReport => {}
                }
            }
        } else {
            warn!("key {}: USB not ready, press dropped", key);
            self.feedback.paint_all(&mut self.keypad, ERROR_COLOR);
        }
        self.feedback.commit(&mut self.keypad);

        if !lock_key {
            self.feedback.schedule_flash_reset(now_ms);
        }
        None
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn report_flags(&self) -> ReportOutstandingFlags {
        self.emitter.flags()
    }

    pub fn timer_state(&self) -> FeedbackTimerState {
        self.feedback.timer_state()
    }

    /// Colour last painted on a key.
    pub fn led_color(&self, key_index: usize) -> Rgb {
        self.feedback.color(key_index)
    }

    pub fn brightness(&self) -> f32 {
        self.feedback.brightness()
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

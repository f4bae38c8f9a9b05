//! Status LED blinker.
//!
//! Free-running square wave whose period tells the USB link state at a
//! glance: fast while not enumerated, slow once mounted, very slow while
//! the bus is suspended.

use crate::config::{BLINK_MOUNTED_MS, BLINK_NOT_MOUNTED_MS, BLINK_SUSPENDED_MS};
use embedded_hal::digital::{OutputPin, PinState};

/// USB link state as reported by the device handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    #[default]
    NotMounted,
    Mounted,
    Suspended,
}

impl LinkState {
    pub fn blink_interval_ms(self) -> u32 {
        match self {
            LinkState::NotMounted => BLINK_NOT_MOUNTED_MS,
            LinkState::Mounted => BLINK_MOUNTED_MS,
            LinkState::Suspended => BLINK_SUSPENDED_MS,
        }
    }
}

pub struct StatusBlink<P> {
    pin: P,
    state: LinkState,
    interval_ms: u32,
    window_start_ms: u32,
    led_on: bool,
}

impl<P: OutputPin> StatusBlink<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: LinkState::NotMounted,
            interval_ms: LinkState::NotMounted.blink_interval_ms(),
            window_start_ms: 0,
            led_on: false,
        }
    }

    /// Switch to the period of a new link state. The running window is kept.
    pub fn set_link_state(&mut self, state: LinkState) {
        if state != self.state {
            debug!("status LED: {}", state);
            self.state = state;
            self.interval_ms = state.blink_interval_ms();
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.state
    }

    /// Drive the pin and toggle once the interval has elapsed.
    pub fn tick(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.window_start_ms) < self.interval_ms {
            return;
        }
        self.window_start_ms = self.window_start_ms.wrapping_add(self.interval_ms);

        if self.pin.set_state(PinState::from(self.led_on)).is_err() {
            warn!("status LED write failed");
        }
        self.led_on = !self.led_on;
    }
}

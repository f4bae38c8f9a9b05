//! HID report emitter.
//!
//! Turns a pressed key's [`ActionDescriptor`] into an input report and
//! makes sure every "key down" is followed by exactly one empty report on
//! a later tick. Only one report kind is ever outstanding: a keyboard
//! press is ignored while a consumer usage is held and vice versa.

use crate::action::{ActionDescriptor, ReportCategory};
use crate::error::Error;
use crate::hid::consumer::CONSUMER_REPORT_SIZE;
use crate::hid::{ConsumerReport, REPORT_ID_CONSUMER_CONTROL};

/// USB HID transport as seen by the controller.
pub trait HidTransport {
    /// Device is configured and the HID endpoint can take a report.
    fn is_ready(&self) -> bool;

    /// Bus is suspended by the host.
    fn is_suspended(&self) -> bool;

    /// Ask the host to resume the bus.
    fn request_remote_wakeup(&mut self);

    /// Queue a keyboard report (report ID 1).
    fn send_keyboard_report(&mut self, modifier: u8, keycodes: [u8; 6]) -> Result<(), Error>;

    /// Queue a report given as ID + payload bytes.
    fn send_raw_report(&mut self, report_id: u8, data: &[u8]) -> Result<(), Error>;
}

/// Which report kind still needs its empty follow-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportOutstandingFlags {
    pub keyboard_key_held: bool,
    pub consumer_key_held: bool,
}

/// What a call to [`ReportEmitter::press`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// A report went out and is now held.
    Sent,
    /// The other report kind is still held.
    Suppressed,
    /// The action sends no report.
    NoReport,
    /// The transport refused the report.
    Failed(Error),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReportEmitter {
    flags: ReportOutstandingFlags,
}

impl ReportEmitter {
    pub const fn new() -> Self {
        Self {
            flags: ReportOutstandingFlags {
                keyboard_key_held: false,
                consumer_key_held: false,
            },
        }
    }

    pub fn flags(&self) -> ReportOutstandingFlags {
        self.flags
    }

    /// Send the empty report for whatever is held.
    ///
    /// Returns `true` when a release was sent; the caller must then end
    /// the tick without sampling input. Nothing happens while the
    /// transport is not ready, the flags stay set until it is.
    pub fn release<T: HidTransport>(&mut self, transport: &mut T) -> bool {
        if !transport.is_ready() {
            return false;
        }

        if self.flags.keyboard_key_held {
            if let Err(_e) = transport.send_keyboard_report(0, [0; 6]) {
                warn!("keyboard release failed: {}", _e);
            }
            self.flags.keyboard_key_held = false;
            true
        } else if self.flags.consumer_key_held {
            let mut payload = [0u8; CONSUMER_REPORT_SIZE];
            ConsumerReport::empty().serialize(&mut payload);
            if let Err(_e) = transport.send_raw_report(REPORT_ID_CONSUMER_CONTROL, &payload) {
                warn!("consumer release failed: {}", _e);
            }
            self.flags.consumer_key_held = false;
            true
        } else {
            false
        }
    }

    /// Send the report for a pressed key. The caller checks readiness.
    pub fn press<T: HidTransport>(
        &mut self,
        action: &ActionDescriptor,
        transport: &mut T,
    ) -> PressOutcome {
        match action.category {
            ReportCategory::Keyboard => {
                if self.flags.consumer_key_held {
                    return PressOutcome::Suppressed;
                }
                let mut keycodes = [0u8; 6];
                keycodes[0] = action.key_code;
                match transport.send_keyboard_report(action.modifier_mask, keycodes) {
                    Ok(()) => {
                        self.flags.keyboard_key_held = true;
                        PressOutcome::Sent
                    }
                    Err(e) => PressOutcome::Failed(e),
                }
            }
            ReportCategory::ConsumerControl => {
                if self.flags.keyboard_key_held {
                    return PressOutcome::Suppressed;
                }
                let mut payload = [0u8; CONSUMER_REPORT_SIZE];
                ConsumerReport::new(u16::from(action.key_code)).serialize(&mut payload);
                match transport.send_raw_report(REPORT_ID_CONSUMER_CONTROL, &payload) {
                    Ok(()) => {
                        self.flags.consumer_key_held = true;
                        PressOutcome::Sent
                    }
                    Err(e) => PressOutcome::Failed(e),
                }
            }
            ReportCategory::DeviceCommand => PressOutcome::NoReport,
        }
    }
}

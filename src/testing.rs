//! Recording fakes for the keypad and transport collaborators.

use crate::color::Rgb;
use crate::config::NUM_KEYS;
use crate::emitter::HidTransport;
use crate::error::{Error, KeypadError};
use crate::keypad::Keypad;

/// What a [`RecordingTransport`] was asked to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Keyboard { modifier: u8, keycodes: [u8; 6] },
    Raw { report_id: u8, data: Vec<u8> },
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub ready: bool,
    pub suspended: bool,
    pub fail_sends: bool,
    pub wakeups: usize,
    pub sent: Vec<Sent>,
}

impl RecordingTransport {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }
}

impl HidTransport for RecordingTransport {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn request_remote_wakeup(&mut self) {
        self.wakeups += 1;
    }

    fn send_keyboard_report(&mut self, modifier: u8, keycodes: [u8; 6]) -> Result<(), Error> {
        if self.fail_sends {
            return Err(Error::Usb);
        }
        self.sent.push(Sent::Keyboard { modifier, keycodes });
        Ok(())
    }

    fn send_raw_report(&mut self, report_id: u8, data: &[u8]) -> Result<(), Error> {
        if self.fail_sends {
            return Err(Error::Usb);
        }
        self.sent.push(Sent::Raw {
            report_id,
            data: data.to_vec(),
        });
        Ok(())
    }
}

/// Keypad fake: buffers like the hardware and keeps every committed frame.
#[derive(Debug)]
pub struct RecordingKeypad {
    pub buttons: u16,
    pub fail_reads: bool,
    pub brightness: f32,
    pub buffer: [Rgb; NUM_KEYS],
    /// (brightness, colours) at each successful `update`.
    pub commits: Vec<(f32, [Rgb; NUM_KEYS])>,
}

impl RecordingKeypad {
    pub fn new() -> Self {
        Self {
            buttons: 0,
            fail_reads: false,
            brightness: 0.0,
            buffer: [Rgb::OFF; NUM_KEYS],
            commits: Vec::new(),
        }
    }

    pub fn last_commit(&self) -> Option<&(f32, [Rgb; NUM_KEYS])> {
        self.commits.last()
    }
}

impl Keypad for RecordingKeypad {
    fn init(&mut self) -> Result<(), Error> {
        self.buffer = [Rgb::OFF; NUM_KEYS];
        self.update()
    }

    fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness;
    }

    fn illuminate(&mut self, index: usize, color: Rgb) {
        self.buffer[index] = color;
    }

    fn update(&mut self) -> Result<(), Error> {
        self.commits.push((self.brightness, self.buffer));
        Ok(())
    }

    fn button_states(&mut self) -> Result<u16, Error> {
        if self.fail_reads {
            return Err(KeypadError::I2c.into());
        }
        Ok(self.buttons)
    }
}

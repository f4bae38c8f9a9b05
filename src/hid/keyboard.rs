//! USB HID keyboard report (boot protocol compatible) and lock indicators.
//!
//! Input report layout (8 bytes, after the report ID):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 key codes (USB HID usage codes), only slot 0 is used
//! ```
//!
//! Output report (1 byte, host → device): lock indicator LEDs.

/// Keyboard report size in bytes (without report ID).
pub const KEYBOARD_REPORT_SIZE: usize = 8;

// Modifier bits

pub const MODIFIER_LEFT_CTRL: u8 = 0x01;
pub const MODIFIER_LEFT_SHIFT: u8 = 0x02;
pub const MODIFIER_LEFT_ALT: u8 = 0x04;
pub const MODIFIER_LEFT_GUI: u8 = 0x08;

// Lock key usage codes (Keyboard/Keypad page 0x07)

pub const KEY_CAPS_LOCK: u8 = 0x39;
pub const KEY_SCROLL_LOCK: u8 = 0x47;
pub const KEY_NUM_LOCK: u8 = 0x53;

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Key code slots. The macropad only ever fills slot 0.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Parse from raw report payload bytes (report ID already stripped).
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < KEYBOARD_REPORT_SIZE {
            return None;
        }
        Some(Self {
            modifier: data[0],
            reserved: data[1],
            keycodes: [data[2], data[3], data[4], data[5], data[6], data[7]],
        })
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// The three host lock indicators a key can mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockRole {
    Caps,
    Num,
    Scroll,
}

impl LockRole {
    /// All roles, in record-slot order.
    pub const ALL: [LockRole; 3] = [LockRole::Caps, LockRole::Num, LockRole::Scroll];

    /// Role driven by a key code, if the key code is one of the lock keys.
    pub fn from_keycode(keycode: u8) -> Option<Self> {
        match keycode {
            KEY_CAPS_LOCK => Some(LockRole::Caps),
            KEY_NUM_LOCK => Some(LockRole::Num),
            KEY_SCROLL_LOCK => Some(LockRole::Scroll),
            _ => None,
        }
    }

    /// Slot of this role in a `[_; 3]` record array.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Bit of this role in the host's LED output report.
    pub fn led_mask(self) -> u8 {
        match self {
            LockRole::Num => LockIndicators::NUM_LOCK,
            LockRole::Caps => LockIndicators::CAPS_LOCK,
            LockRole::Scroll => LockIndicators::SCROLL_LOCK,
        }
    }
}

/// Lock indicator state as sent by the host in the keyboard output report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockIndicators(u8);

impl LockIndicators {
    pub const NUM_LOCK: u8 = 0x01;
    pub const CAPS_LOCK: u8 = 0x02;
    pub const SCROLL_LOCK: u8 = 0x04;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Parse the output report payload (report ID already stripped).
    pub fn from_report(data: &[u8]) -> Option<Self> {
        data.first().map(|&bits| Self(bits))
    }

    /// Decode a keyboard output report as delivered by the USB stack.
    ///
    /// The OUT endpoint keeps the report ID in front of the LED byte while
    /// SET_REPORT strips it, so a leading ID is dropped only when a byte
    /// follows it. A lone `0x01` is Num Lock. Other report IDs yield `None`.
    pub fn from_output_report(report_id: u8, data: &[u8]) -> Option<Self> {
        if report_id != super::REPORT_ID_KEYBOARD {
            return None;
        }
        let payload = match data {
            [super::REPORT_ID_KEYBOARD, rest @ ..] if !rest.is_empty() => rest,
            _ => data,
        };
        Self::from_report(payload)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_on(&self, role: LockRole) -> bool {
        self.0 & role.led_mask() != 0
    }
}

/// Keyboard collection of the composite report descriptor (report ID 1).
///
/// Declares:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub(crate) const KEYBOARD_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x85, super::REPORT_ID_KEYBOARD, //   Report ID (1)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];

//! HID report types and the composite report descriptor.
//!
//! The macropad exposes one HID interface carrying two report IDs:
//! a boot-compatible keyboard (ID 1, with lock-indicator output) and a
//! consumer control (ID 2).

pub mod consumer;
pub mod keyboard;


pub use consumer::ConsumerReport;
pub use keyboard::{KeyboardReport, LockIndicators, LockRole};

/// Report ID of the keyboard collection.
pub const REPORT_ID_KEYBOARD: u8 = 1;

/// Report ID of the consumer control collection.
pub const REPORT_ID_CONSUMER_CONTROL: u8 = 2;

/// Largest serialized input report: report ID + keyboard payload.
pub const MAX_REPORT_SIZE: usize = 1 + keyboard::KEYBOARD_REPORT_SIZE;

/// Composite report descriptor announced to the host.
pub static REPORT_DESCRIPTOR: [u8; keyboard::KEYBOARD_DESCRIPTOR.len()
    + consumer::CONSUMER_DESCRIPTOR.len()] =
    concat_descriptors(keyboard::KEYBOARD_DESCRIPTOR, consumer::CONSUMER_DESCRIPTOR);

const fn concat_descriptors<const N: usize>(a: &[u8], b: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = 0;
    while i < a.len() {
        out[i] = a[i];
        i += 1;
    }
    let mut j = 0;
    while j < b.len() {
        out[a.len() + j] = b[j];
        j += 1;
    }
    out
}

/// An input report on its way to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Consumer(ConsumerReport),
}

impl HidReport {
    pub fn report_id(&self) -> u8 {
        match self {
            HidReport::Keyboard(_) => REPORT_ID_KEYBOARD,
            HidReport::Consumer(_) => REPORT_ID_CONSUMER_CONTROL,
        }
    }

    /// Serialise with the leading report ID byte.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        let Some((id, payload)) = buf.split_first_mut() else {
            return 0;
        };
        let n = match self {
            HidReport::Keyboard(k) => k.serialize(payload),
            HidReport::Consumer(c) => c.serialize(payload),
        };
        if n == 0 {
            return 0;
        }
        *id = self.report_id();
        n + 1
    }

    /// `true` for the all-released report of either kind.
    pub fn is_release(&self) -> bool {
        match self {
            HidReport::Keyboard(k) => k.is_empty(),
            HidReport::Consumer(c) => c.is_empty(),
        }
    }
}

/// Build a typed report from a report ID and its payload bytes.
///
/// Returns `None` for unknown IDs or short payloads.
pub fn classify_report(report_id: u8, data: &[u8]) -> Option<HidReport> {
    match report_id {
        REPORT_ID_KEYBOARD => KeyboardReport::from_bytes(data).map(HidReport::Keyboard),
        REPORT_ID_CONSUMER_CONTROL => ConsumerReport::from_bytes(data).map(HidReport::Consumer),
        _ => None,
    }
}

//! Consumer control report (usage page 0x0C).
//!
//! Media keys share the keyboard's HID interface under report ID 2. The
//! payload is a single little-endian 16-bit usage; zero means released.
//! Usage values come from [`usbd_hid::descriptor::MediaKey`].

/// Payload size after the report ID.
pub const CONSUMER_REPORT_SIZE: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usage: u16,
}

impl ConsumerReport {
    /// All media keys released.
    pub const fn empty() -> Self {
        Self { usage: 0 }
    }

    pub const fn new(usage: u16) -> Self {
        Self { usage }
    }

    /// Decode a payload whose report ID has been stripped.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            [lo, hi, ..] => Some(Self::new(u16::from_le_bytes([*lo, *hi]))),
            _ => None,
        }
    }

    /// Returns the bytes written, or 0 if `buf` cannot hold the payload.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        let Some(out) = buf.get_mut(..CONSUMER_REPORT_SIZE) else {
            return 0;
        };
        out.copy_from_slice(&self.usage.to_le_bytes());
        CONSUMER_REPORT_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
}

/// Consumer collection of the composite report descriptor (report ID 2).
pub(crate) const CONSUMER_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x85, super::REPORT_ID_CONSUMER_CONTROL, //   Report ID (2)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;
    use usbd_hid::descriptor::MediaKey;

    #[test]
    fn empty_report_is_release() {
        let report = ConsumerReport::empty();
        assert!(report.is_empty());
        assert_eq!(report, ConsumerReport::default());
    }

    #[test]
    fn play_pause_is_little_endian_on_the_wire() {
        let report = ConsumerReport::new(u16::from(MediaKey::PlayPause));
        assert!(!report.is_empty());

        let mut buf = [0xFFu8; 3];
        assert_eq!(report.serialize(&mut buf), CONSUMER_REPORT_SIZE);
        assert_eq!(buf, [0xCD, 0x00, 0xFF]);
    }

    #[test]
    fn short_buffer_writes_nothing() {
        let mut buf = [0u8; 1];
        assert_eq!(ConsumerReport::new(0xB5).serialize(&mut buf), 0);
        assert_eq!(buf, [0]);
    }

    #[test]
    fn decodes_next_track() {
        let report = ConsumerReport::from_bytes(&[0xB5, 0x00]).unwrap();
        assert_eq!(report.usage, u16::from(MediaKey::NextTrack));
        assert!(ConsumerReport::from_bytes(&[0xB5]).is_none());
    }
}

//! [`HidTransport`] backed by the embassy-usb device.
//!
//! Sends never block: a report is queued for the writer task, and a full
//! queue counts as "not ready" so the controller drops the press.

use rgb_macropad::emitter::HidTransport;
use rgb_macropad::hid::{classify_report, HidReport, KeyboardReport};
use rgb_macropad::Error;

use super::hid_device::{self, HID_REPORTS, REMOTE_WAKEUP};

#[derive(Clone, Copy, Default)]
pub struct UsbHidTransport;

impl UsbHidTransport {
    fn queue(&mut self, report: HidReport) -> Result<(), Error> {
        HID_REPORTS.try_send(report).map_err(|_| Error::NotReady)
    }
}

impl HidTransport for UsbHidTransport {
    fn is_ready(&self) -> bool {
        hid_device::is_configured() && !hid_device::is_suspended() && !HID_REPORTS.is_full()
    }

    fn is_suspended(&self) -> bool {
        hid_device::is_suspended()
    }

    fn request_remote_wakeup(&mut self) {
        // Without the host's permission the wakeup can only fail.
        if hid_device::remote_wakeup_enabled() {
            REMOTE_WAKEUP.signal(());
        }
    }

    fn send_keyboard_report(&mut self, modifier: u8, keycodes: [u8; 6]) -> Result<(), Error> {
        self.queue(HidReport::Keyboard(KeyboardReport {
            modifier,
            reserved: 0,
            keycodes,
        }))
    }

    fn send_raw_report(&mut self, report_id: u8, data: &[u8]) -> Result<(), Error> {
        let report = classify_report(report_id, data).ok_or(Error::Usb)?;
        self.queue(report)
    }
}

//! USB device subsystem - presents the macropad to the host as one HID interface.
//!
//! The RP2040's USB 1.1 Full-Speed controller is driven by `embassy-usb`.
//! A single HID interface carries both report IDs of
//! [`rgb_macropad::hid::REPORT_DESCRIPTOR`]:
//!
//! - ID 1: Keyboard (input) + lock indicator LEDs (output)
//! - ID 2: Consumer control (input)
//!
//! The controller never touches the endpoints directly. It queues reports
//! through [`transport::UsbHidTransport`]; the writer task drains that queue
//! and the reader task turns host LED reports into lock-indicator signals.

pub mod hid_device;
pub mod transport;

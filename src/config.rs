//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, colours, pin assignments and USB identity
//! constants live here so they can be tuned in one place.

use crate::color::Rgb;

// Timing

/// Input sampling period (ms). One button read and at most one report per tick.
pub const POLL_INTERVAL_MS: u32 = 10;

/// Delay between a press highlight and the repaint of every key (ms).
pub const FLASH_RESET_MS: u32 = 300;

/// Inactivity window before the panel is dimmed (ms). 5 minutes.
pub const DIM_LED_DURATION_MS: u32 = 5 * 60 * 1000;

// Brightness

/// Panel brightness while active.
pub const MAX_BRIGHTNESS: f32 = 1.0;

/// Panel brightness after the inactivity window has elapsed.
pub const MIN_BRIGHTNESS: f32 = 0.2;

// Colours

/// Colour a key flashes while its report is being sent.
pub const HIGHLIGHT_COLOR: Rgb = Rgb::new(0x20, 0x20, 0x00);

/// Colour every key shows when a press was dropped because USB was not ready.
pub const ERROR_COLOR: Rgb = Rgb::new(0x20, 0x00, 0x00);

/// Colour of a lock key while the host reports its lock as active.
pub const LOCK_ACTIVE_COLOR: Rgb = Rgb::new(0x20, 0x20, 0x20);

// Status LED blink periods

/// Blink period while the device is not enumerated (ms).
pub const BLINK_NOT_MOUNTED_MS: u32 = 250;

/// Blink period while the device is configured by a host (ms).
pub const BLINK_MOUNTED_MS: u32 = 1000;

/// Blink period while the bus is suspended (ms).
pub const BLINK_SUSPENDED_MS: u32 = 2500;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "rgb-macropad";
pub const USB_PRODUCT: &str = "Pico RGB Macro Keypad";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

// Keypad hardware (Pimoroni Pico RGB Keypad)
//
// These are logical names; the actual `embassy_rp::peripherals::*` pins
// are selected in `main.rs`.
//
//   I²C0 SDA       → GP4
//   I²C0 SCL       → GP5
//   SPI0 CS        → GP17
//   SPI0 SCK       → GP18
//   SPI0 MOSI      → GP19
//   Status LED     → GP25 (Pico on-board LED)

/// Number of keys on the pad.
pub const NUM_KEYS: usize = 16;

/// I²C address of the TCA9555 button expander.
pub const KEYPAD_I2C_ADDRESS: u8 = 0x20;

/// I²C bus frequency for the button expander (Hz).
pub const KEYPAD_I2C_FREQUENCY: u32 = 400_000;

/// SPI clock for the APA102 LED chain (Hz).
pub const KEYPAD_SPI_FREQUENCY: u32 = 4_000_000;

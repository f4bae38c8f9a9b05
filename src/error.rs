//! Unified error type for rgb-macropad.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Keypad
    /// Bus transaction with the keypad hardware failed.
    Keypad(KeypadError),

    // USB
    /// The HID transport cannot take a report right now.
    NotReady,

    /// USB stack returned an error.
    Usb,
}

/// Which part of the keypad hardware failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// Reading the button expander failed.
    I2c,
    /// Writing the LED frame failed.
    Spi,
    /// Driving the LED chip-select line failed.
    ChipSelect,
}

// Convenience conversions

impl From<KeypadError> for Error {
    fn from(e: KeypadError) -> Self {
        Error::Keypad(e)
    }
}

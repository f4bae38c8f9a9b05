//! Keypad hardware - buttons and per-key RGB LEDs.
//!
//! The controller talks to the pad only through the [`Keypad`] trait.
//! [`PicoRgbKeypad`] implements it for the Pimoroni Pico RGB Keypad:
//!
//! - **Buttons**: TCA9555 16-bit I/O expander on I²C, active-low inputs
//! - **LEDs**: 16 × APA102 on SPI with a manual chip-select line
//!
//! LED colours are buffered by [`Keypad::illuminate`] and only reach the
//! hardware on [`Keypad::update`].

use crate::color::Rgb;
use crate::config::{KEYPAD_I2C_ADDRESS, NUM_KEYS};
use crate::error::{Error, KeypadError};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiBus;

/// Keypad collaborator used by the controller.
pub trait Keypad {
    /// Blank every LED and push the blank frame.
    fn init(&mut self) -> Result<(), Error>;

    /// Set global brightness, 0.0 - 1.0. Buffered until `update`.
    fn set_brightness(&mut self, brightness: f32);

    /// Buffer a colour for one key. Buffered until `update`.
    fn illuminate(&mut self, index: usize, color: Rgb);

    /// Commit buffered colours and brightness to the LEDs.
    fn update(&mut self) -> Result<(), Error>;

    /// Current button bitmask, bit N set while key N is held.
    fn button_states(&mut self) -> Result<u16, Error>;
}

/// TCA9555 input port 0 register (port 1 follows on auto-increment).
const REG_INPUT_PORT0: u8 = 0x00;

/// Brightness the driver starts with before the controller takes over.
const DEFAULT_BRIGHTNESS: f32 = 0.5;

const START_FRAME_SIZE: usize = 4;
const LED_FRAME_SIZE: usize = 4;
const END_FRAME_SIZE: usize = 4;

/// Full APA102 frame: start frame, one 4-byte frame per LED, end frame.
pub const LED_FRAME_BYTES: usize = START_FRAME_SIZE + NUM_KEYS * LED_FRAME_SIZE + END_FRAME_SIZE;

/// Pimoroni Pico RGB Keypad driver.
pub struct PicoRgbKeypad<I2C, SPI, CS> {
    i2c: I2C,
    spi: SPI,
    cs: CS,
    frame: [u8; LED_FRAME_BYTES],
}

impl<I2C, SPI, CS> PicoRgbKeypad<I2C, SPI, CS>
where
    I2C: I2c,
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(i2c: I2C, spi: SPI, cs: CS) -> Self {
        let mut frame = [0u8; LED_FRAME_BYTES];
        frame[LED_FRAME_BYTES - END_FRAME_SIZE..].fill(0xFF);
        let mut keypad = Self {
            i2c,
            spi,
            cs,
            frame,
        };
        keypad.set_brightness(DEFAULT_BRIGHTNESS);
        keypad
    }

    /// The frame that the next `update` will shift out.
    pub fn frame(&self) -> &[u8; LED_FRAME_BYTES] {
        &self.frame
    }

    fn led_offset(index: usize) -> usize {
        START_FRAME_SIZE + index * LED_FRAME_SIZE
    }
}

impl<I2C, SPI, CS> Keypad for PicoRgbKeypad<I2C, SPI, CS>
where
    I2C: I2c,
    SPI: SpiBus,
    CS: OutputPin,
{
    fn init(&mut self) -> Result<(), Error> {
        for index in 0..NUM_KEYS {
            self.illuminate(index, Rgb::OFF);
        }
        self.update()
    }

    fn set_brightness(&mut self, brightness: f32) {
        // APA102 global brightness is 5 bits behind a 0b111 marker.
        let level = (brightness.clamp(0.0, 1.0) * 31.0) as u8;
        for index in 0..NUM_KEYS {
            self.frame[Self::led_offset(index)] = 0b1110_0000 | level;
        }
    }

    fn illuminate(&mut self, index: usize, color: Rgb) {
        let offset = Self::led_offset(index);
        self.frame[offset + 1] = color.b;
        self.frame[offset + 2] = color.g;
        self.frame[offset + 3] = color.r;
    }

    fn update(&mut self) -> Result<(), Error> {
        self.cs
            .set_low()
            .map_err(|_| KeypadError::ChipSelect)?;
        let written = self
            .spi
            .write(&self.frame)
            .and_then(|()| self.spi.flush())
            .map_err(|_| KeypadError::Spi);
        self.cs
            .set_high()
            .map_err(|_| KeypadError::ChipSelect)?;
        written?;
        Ok(())
    }

    fn button_states(&mut self) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(KEYPAD_I2C_ADDRESS, &[REG_INPUT_PORT0], &mut buf)
            .map_err(|_| KeypadError::I2c)?;
        // Buttons pull their inputs low.
        Ok(!u16::from_le_bytes(buf))
    }
}

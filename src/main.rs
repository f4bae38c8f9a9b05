//! rgb-macropad firmware entry point.
//!
//! Target: Raspberry Pi Pico (RP2040) + Pimoroni Pico RGB Keypad.
//!
//! Task layout:
//!
//! - `usb_device_task`: runs the USB stack, performs remote wakeup
//! - `hid_writer_task`: writes queued reports to the HID IN endpoint
//! - `hid_reader_task`: receives host LED reports (caps/num/scroll)
//! - main task: 1 ms loop driving the status LED and the macropad controller
//!
//! Build: `cargo build --release --features embedded --target thumbv6m-none-eabi`

#![no_std]
#![no_main]

mod usb;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use rgb_macropad::blink::StatusBlink;
use rgb_macropad::config;
use rgb_macropad::keymap;
use rgb_macropad::keypad::PicoRgbKeypad;
use rgb_macropad::{Command, Macropad, Timing};

use usb::hid_device;
use usb::transport::UsbHidTransport;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("rgb-macropad starting");

    // USB
    let usb = hid_device::init(p.USB);
    unwrap!(spawner.spawn(hid_device::usb_device_task(usb.device)));
    unwrap!(spawner.spawn(hid_device::hid_writer_task(usb.writer)));
    unwrap!(spawner.spawn(hid_device::hid_reader_task(usb.reader)));

    // Keypad: TCA9555 buttons on I2C0, APA102 LEDs on SPI0
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config::KEYPAD_I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = config::KEYPAD_SPI_FREQUENCY;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    let keypad = PicoRgbKeypad::new(i2c, spi, cs);
    let mut pad = Macropad::new(keypad, UsbHidTransport, Timing::default(), now_ms());
    keymap::apply(&mut pad, &keymap::default_keymap());

    let mut status_led = StatusBlink::new(Output::new(p.PIN_25, Level::Low));

    info!("entering main loop");
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        let now = now_ms();

        status_led.set_link_state(hid_device::link_state());
        status_led.tick(now);

        if let Some(indicators) = hid_device::LOCK_INDICATORS.try_take() {
            pad.set_lock_indicators(indicators);
        }

        if let Some(Command::EnterBootloader) = pad.poll(now) {
            info!("rebooting into USB bootloader");
            embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        }

        ticker.next().await;
    }
}

/// Milliseconds since boot on the wrapping 32-bit clock the controller uses.
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

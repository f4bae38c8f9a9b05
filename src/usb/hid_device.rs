//! USB HID device - composite keyboard + consumer control.
//!
//! Initialises the Embassy USB stack on the RP2040 USB peripheral and
//! exposes one HID endpoint pair. Device state (configured / suspended)
//! is published through atomics so the poll loop can read it without
//! awaiting.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use rgb_macropad::blink::LinkState;
use rgb_macropad::config;
use rgb_macropad::hid::{HidReport, LockIndicators, MAX_REPORT_SIZE, REPORT_DESCRIPTOR};

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

pub type UsbDriver = Driver<'static, USB>;

/// Output reports are one LED byte behind the report ID.
const HID_READ_N: usize = 8;

/// Depth of the report queue between the poll loop and the writer task.
pub const REPORT_QUEUE_DEPTH: usize = 4;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_DEVICE_HANDLER: StaticCell<UsbDeviceHandler> = StaticCell::new();
static CONTROL_REQUEST_HANDLER: StaticCell<LockIndicatorHandler> = StaticCell::new();

static CONFIGURED: AtomicBool = AtomicBool::new(false);
static SUSPENDED: AtomicBool = AtomicBool::new(false);
static REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);

/// Reports queued by the poll loop for the writer task.
pub static HID_REPORTS: Channel<CriticalSectionRawMutex, HidReport, REPORT_QUEUE_DEPTH> =
    Channel::new();

/// Latest lock indicator state sent by the host.
pub static LOCK_INDICATORS: Signal<CriticalSectionRawMutex, LockIndicators> = Signal::new();

/// Raised by the poll loop while the bus is suspended and the host allows wakeup.
pub static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

pub fn is_configured() -> bool {
    CONFIGURED.load(Ordering::Acquire)
}

pub fn is_suspended() -> bool {
    SUSPENDED.load(Ordering::Acquire)
}

/// Whether the host has armed remote wakeup (SET_FEATURE DEVICE_REMOTE_WAKEUP).
pub fn remote_wakeup_enabled() -> bool {
    REMOTE_WAKEUP_ENABLED.load(Ordering::Acquire)
}

/// Link state for the status LED.
pub fn link_state() -> LinkState {
    if is_suspended() {
        LinkState::Suspended
    } else if is_configured() {
        LinkState::Mounted
    } else {
        LinkState::NotMounted
    }
}

struct UsbDeviceHandler;

impl Handler for UsbDeviceHandler {
    fn reset(&mut self) {
        debug!("USB bus reset");
        REMOTE_WAKEUP_ENABLED.store(false, Ordering::Release);
    }

    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Release);
        if configured {
            info!("USB configured by host");
        } else {
            info!("USB no longer configured");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Release);
        if suspended {
            info!("USB suspended");
        } else {
            info!("USB resumed");
        }
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Release);
        debug!("USB remote wakeup enabled: {}", enabled);
    }
}

/// Turns keyboard output reports into lock-indicator updates.
///
/// Used for both the control pipe (SET_REPORT) and the OUT endpoint.
pub struct LockIndicatorHandler;

impl RequestHandler for LockIndicatorHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let ReportId::Out(report_id) = id else {
            return OutResponse::Rejected;
        };
        match LockIndicators::from_output_report(report_id, data) {
            Some(indicators) => {
                LOCK_INDICATORS.signal(indicators);
                OutResponse::Accepted
            }
            None => OutResponse::Rejected,
        }
    }
}

/// Build result containing the USB device runner and the HID endpoints.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: HidReader<'static, UsbDriver, HID_READ_N>,
    pub writer: HidWriter<'static, UsbDriver, MAX_REPORT_SIZE>,
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usb: USB) -> UsbHidDevice {
    let driver = Driver::new(usb, Irqs);

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    builder.handler(USB_DEVICE_HANDLER.init(UsbDeviceHandler));

    let hid_config = HidConfig {
        report_descriptor: &REPORT_DESCRIPTOR,
        request_handler: Some(CONTROL_REQUEST_HANDLER.init(LockIndicatorHandler)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 64,
    };
    let hid = HidReaderWriter::<_, HID_READ_N, MAX_REPORT_SIZE>::new(
        &mut builder,
        HID_STATE.init(State::new()),
        hid_config,
    );
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID device initialised (keyboard + consumer control)");

    UsbHidDevice {
        device,
        reader,
        writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// Between suspend and resume it also waits for [`REMOTE_WAKEUP`] and
/// performs the wakeup when the host has enabled it.
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    loop {
        device.run_until_suspend().await;
        REMOTE_WAKEUP.reset();
        match select(device.wait_resume(), REMOTE_WAKEUP.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                debug!("USB requesting remote wakeup");
                if device.remote_wakeup().await.is_err() {
                    debug!("USB remote wakeup failed");
                }
            }
        }
    }
}

/// HID report forwarding task - drains [`HID_REPORTS`] into the IN endpoint.
#[embassy_executor::task]
pub async fn hid_writer_task(mut writer: HidWriter<'static, UsbDriver, MAX_REPORT_SIZE>) -> ! {
    info!("HID writer task started - waiting for reports");

    let mut buf = [0u8; MAX_REPORT_SIZE];

    loop {
        let report = HID_REPORTS.receive().await;
        let n = report.serialize(&mut buf);
        if let Err(e) = writer.write(&buf[..n]).await {
            warn!("USB HID write failed ({}): {}", report.report_id(), e);
        }
    }
}

/// HID output report task - feeds host LED reports into [`LOCK_INDICATORS`].
#[embassy_executor::task]
pub async fn hid_reader_task(reader: HidReader<'static, UsbDriver, HID_READ_N>) -> ! {
    let mut handler = LockIndicatorHandler;
    reader.run(true, &mut handler).await
}

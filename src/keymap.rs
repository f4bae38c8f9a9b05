//! Default key bindings.
//!
//! Layout as seen from above, USB port at the top:
//!
//! ```text
//!  0 Ctrl+Shift+O   1 Ctrl+Up        2 Play/Pause     3 Ctrl+Alt+KP0
//!  4 Ctrl+Shift+M   5 Ctrl+Down      6 Prev track     7 Next track
//!  8 Ctrl+Shift+K   9 Hyper+A       10 Hyper+D       11 Bootloader
//! 12 Caps Lock     13 Num Lock      14 Scroll Lock   15 Gui+L
//! ```
//!
//! Hyper is Gui+Ctrl+Shift+Alt. Lock keys start dark and light up while
//! the host reports the lock as active.

use crate::action::{ActionDescriptor, ReportCategory};
use crate::color::Rgb;
use crate::config::NUM_KEYS;
use crate::controller::Macropad;
use crate::emitter::HidTransport;
use crate::hid::keyboard::{
    KEY_CAPS_LOCK, KEY_NUM_LOCK, KEY_SCROLL_LOCK, MODIFIER_LEFT_ALT, MODIFIER_LEFT_CTRL,
    MODIFIER_LEFT_GUI, MODIFIER_LEFT_SHIFT,
};
use crate::keypad::Keypad;
use usbd_hid::descriptor::MediaKey;

// Keyboard/Keypad page usages used below.
const KEY_A: u8 = 0x04;
const KEY_D: u8 = 0x07;
const KEY_K: u8 = 0x0E;
const KEY_L: u8 = 0x0F;
const KEY_M: u8 = 0x10;
const KEY_O: u8 = 0x12;
const KEY_DOWN_ARROW: u8 = 0x51;
const KEY_UP_ARROW: u8 = 0x52;
const KEY_KEYPAD_0: u8 = 0x62;

const CTRL_SHIFT: u8 = MODIFIER_LEFT_CTRL | MODIFIER_LEFT_SHIFT;
const HYPER: u8 = MODIFIER_LEFT_GUI | MODIFIER_LEFT_CTRL | MODIFIER_LEFT_SHIFT | MODIFIER_LEFT_ALT;

const BLUE: Rgb = Rgb::new(0x00, 0x00, 0x20);
const GREEN: Rgb = Rgb::new(0x00, 0x20, 0x00);
const RED: Rgb = Rgb::new(0x20, 0x00, 0x00);
const CYAN: Rgb = Rgb::new(0x00, 0x20, 0x20);
const MAGENTA: Rgb = Rgb::new(0x20, 0x00, 0x20);
const PINK: Rgb = Rgb::new(0x20, 0x05, 0x20);

fn keyboard(key: u8, color: Rgb, code: u8, modifiers: u8) -> ActionDescriptor {
    ActionDescriptor::new(key, color, code, modifiers, ReportCategory::Keyboard)
}

fn media(key: u8, color: Rgb, usage: MediaKey) -> ActionDescriptor {
    // Transport usages all sit below 0x100.
    let code = u16::from(usage) as u8;
    ActionDescriptor::new(key, color, code, 0, ReportCategory::ConsumerControl)
}

/// The bindings the firmware boots with, indexed by key.
pub fn default_keymap() -> [ActionDescriptor; NUM_KEYS] {
    [
        keyboard(0, BLUE, KEY_O, CTRL_SHIFT),
        keyboard(1, GREEN, KEY_UP_ARROW, MODIFIER_LEFT_CTRL),
        media(2, PINK, MediaKey::PlayPause),
        keyboard(3, RED, KEY_KEYPAD_0, MODIFIER_LEFT_CTRL | MODIFIER_LEFT_ALT),
        keyboard(4, BLUE, KEY_M, CTRL_SHIFT),
        keyboard(5, GREEN, KEY_DOWN_ARROW, MODIFIER_LEFT_CTRL),
        media(6, MAGENTA, MediaKey::PrevTrack),
        media(7, MAGENTA, MediaKey::NextTrack),
        keyboard(8, BLUE, KEY_K, CTRL_SHIFT),
        keyboard(9, CYAN, KEY_A, HYPER),
        keyboard(10, BLUE, KEY_D, HYPER),
        ActionDescriptor::new(11, RED, 0, 0, ReportCategory::DeviceCommand),
        keyboard(12, Rgb::OFF, KEY_CAPS_LOCK, 0),
        keyboard(13, Rgb::OFF, KEY_NUM_LOCK, 0),
        keyboard(14, Rgb::OFF, KEY_SCROLL_LOCK, 0),
        keyboard(15, CYAN, KEY_L, MODIFIER_LEFT_GUI),
    ]
}

/// Configure every key of `keymap` on the pad.
pub fn apply<K: Keypad, T: HidTransport>(pad: &mut Macropad<K, T>, keymap: &[ActionDescriptor]) {
    for action in keymap {
        pad.configure(
            action.key_index,
            action.color,
            action.key_code,
            action.modifier_mask,
            action.category,
        );
    }
    info!("keymap applied: {} keys", keymap.len());
}

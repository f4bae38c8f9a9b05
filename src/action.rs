//! Action table - what each of the 16 keys does when pressed.
//!
//! One [`ActionDescriptor`] slot per key plus one lock-indicator binding
//! per host lock role. The table only keeps bookkeeping; LED side effects
//! of configuring a key are applied by the controller.

use crate::color::Rgb;
use crate::config::NUM_KEYS;
use crate::hid::LockRole;

/// How a key's action reaches the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportCategory {
    /// Keyboard report (keycode + modifiers), report ID 1.
    #[default]
    Keyboard,
    /// Consumer control usage, report ID 2.
    ConsumerControl,
    /// No report; reboots the device into the USB bootloader.
    DeviceCommand,
}

/// The action bound to one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionDescriptor {
    pub key_index: u8,
    /// Keyboard usage code, or the consumer usage code for `ConsumerControl`.
    pub key_code: u8,
    pub modifier_mask: u8,
    pub category: ReportCategory,
    /// Colour the key shows at rest.
    pub color: Rgb,
}

impl ActionDescriptor {
    pub const fn new(
        key_index: u8,
        color: Rgb,
        key_code: u8,
        modifier_mask: u8,
        category: ReportCategory,
    ) -> Self {
        Self {
            key_index,
            key_code,
            modifier_mask,
            category,
            color,
        }
    }

    /// Lock role this key toggles on the host, if any.
    pub fn lock_role(&self) -> Option<LockRole> {
        LockRole::from_keycode(self.key_code)
    }

    pub fn is_device_command(&self) -> bool {
        self.category == ReportCategory::DeviceCommand
    }
}

/// Key bound to a lock role, with the colour it was configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockBinding {
    pub key_index: u8,
    pub original_color: Rgb,
}

/// Fixed-capacity key → action mapping.
#[derive(Clone, Debug, Default)]
pub struct ActionTable {
    actions: [Option<ActionDescriptor>; NUM_KEYS],
    locks: [Option<LockBinding>; 3],
}

impl ActionTable {
    pub const fn new() -> Self {
        Self {
            actions: [None; NUM_KEYS],
            locks: [None; 3],
        }
    }

    /// Register or overwrite the action for `descriptor.key_index`.
    ///
    /// Panics if the key index is out of range.
    pub fn set(&mut self, descriptor: ActionDescriptor) {
        let key = descriptor.key_index;
        let new_role = descriptor.lock_role();

        // The key loses any role it no longer drives.
        for role in LockRole::ALL {
            if Some(role) != new_role && self.bound_key(role) == Some(key) {
                self.locks[role.slot()] = None;
            }
        }
        // Last write wins when two keys claim the same role.
        if let Some(role) = new_role {
            self.locks[role.slot()] = Some(LockBinding {
                key_index: key,
                original_color: descriptor.color,
            });
        }

        self.actions[usize::from(key)] = Some(descriptor);
    }

    /// Remove the action for `key`, releasing any lock role it held.
    ///
    /// Panics if the key index is out of range.
    pub fn clear(&mut self, key: u8) -> Option<ActionDescriptor> {
        for role in LockRole::ALL {
            if self.bound_key(role) == Some(key) {
                self.locks[role.slot()] = None;
            }
        }
        self.actions[usize::from(key)].take()
    }

    pub fn get(&self, key: u8) -> Option<&ActionDescriptor> {
        self.actions.get(usize::from(key)).and_then(Option::as_ref)
    }

    /// Colour the key shows at rest; off for unconfigured keys.
    pub fn assigned_color(&self, key: usize) -> Rgb {
        self.actions[key].map(|a| a.color).unwrap_or(Rgb::OFF)
    }

    /// Overwrite the resting colour of a configured key. Unconfigured keys are ignored.
    pub fn set_assigned_color(&mut self, key: u8, color: Rgb) {
        if let Some(action) = self.actions[usize::from(key)].as_mut() {
            action.color = color;
        }
    }

    pub fn lock_binding(&self, role: LockRole) -> Option<LockBinding> {
        self.locks[role.slot()]
    }

    fn bound_key(&self, role: LockRole) -> Option<u8> {
        self.lock_binding(role).map(|b| b.key_index)
    }
}

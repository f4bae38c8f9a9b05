//! Single-slot one-shot timer on the wrapping millisecond clock.
//!
//! Arming an already armed timer replaces the previous deadline, so at
//! most one instance is ever outstanding.

/// A cancellable one-shot deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneShot {
    armed_at: u32,
    duration_ms: u32,
    armed: bool,
}

impl OneShot {
    pub const fn new() -> Self {
        Self {
            armed_at: 0,
            duration_ms: 0,
            armed: false,
        }
    }

    /// (Re)arm to fire `duration_ms` after `now_ms`, cancelling any pending instance.
    pub fn arm(&mut self, now_ms: u32, duration_ms: u32) {
        self.armed_at = now_ms;
        self.duration_ms = duration_ms;
        self.armed = true;
    }

    /// Cancel the pending instance. No-op if none is armed.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns `true` exactly once when the deadline has passed, disarming the timer.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.armed && now_ms.wrapping_sub(self.armed_at) >= self.duration_ms {
            self.armed = false;
            return true;
        }
        false
    }
}

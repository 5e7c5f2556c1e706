//! Screen inactivity timer - powers the OLED down when nobody is using it.
//!
//! Every routed action pushes the deadline back and wakes the panel.
//! The panel loop calls [`InactivityTimer::tick`]; the panel is switched
//! off exactly once per deadline crossing.

use crate::ui::Display;
use crate::Result;

/// Decide whether screen should be on based on the inactivity policy.
pub fn screen_should_be_on(auto_off_enabled: bool, idle_ms: u64, auto_off_timeout_ms: u64) -> bool {
    !(auto_off_enabled && idle_ms >= auto_off_timeout_ms)
}

/// A display power transition requested by the timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerChange {
    On,
    Off,
}

impl PowerChange {
    /// Send the transition to the panel.
    pub fn apply<D: Display + ?Sized>(self, display: &mut D) -> Result<()> {
        display.set_power(self == PowerChange::On)
    }
}

/// Tracks the sleep deadline and the panel power state.
#[derive(Clone, Copy, Debug)]
pub struct InactivityTimer {
    auto_off_enabled: bool,
    timeout_ms: u64,
    last_activity_ms: u64,
    display_on: bool,
}

impl InactivityTimer {
    /// Start with the panel on and the deadline one timeout from `now_ms`.
    pub const fn new(now_ms: u64, timeout_ms: u64, auto_off_enabled: bool) -> Self {
        Self {
            auto_off_enabled,
            timeout_ms,
            last_activity_ms: now_ms,
            display_on: true,
        }
    }

    /// Same policy with the deadline restarted from `now_ms` and the panel on.
    pub const fn restarted(self, now_ms: u64) -> Self {
        Self::new(now_ms, self.timeout_ms, self.auto_off_enabled)
    }

    /// The instant (ms) at or after which the panel goes to sleep.
    pub fn deadline_ms(&self) -> u64 {
        self.last_activity_ms.saturating_add(self.timeout_ms)
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    /// Record activity. Returns `PowerChange::On` if the panel was asleep.
    pub fn touch(&mut self, now_ms: u64) -> Option<PowerChange> {
        self.last_activity_ms = now_ms;
        if self.display_on {
            None
        } else {
            self.display_on = true;
            #[cfg(feature = "defmt")]
            defmt::debug!("Display: waking");
            Some(PowerChange::On)
        }
    }

    /// Periodic check. Returns `PowerChange::Off` once when the deadline passes.
    pub fn tick(&mut self, now_ms: u64) -> Option<PowerChange> {
        let idle_ms = now_ms.saturating_sub(self.last_activity_ms);
        if self.display_on && !screen_should_be_on(self.auto_off_enabled, idle_ms, self.timeout_ms) {
            self.display_on = false;
            #[cfg(feature = "defmt")]
            defmt::debug!("Display: sleeping after {=u64} ms idle", idle_ms);
            Some(PowerChange::Off)
        } else {
            None
        }
    }
}

//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and remote-control
//! codes live here so they can be tuned in one place.

use crate::router::Action;

// IR decoder

/// Decoding stops once accumulation has run this long (ms).
pub const IR_QUIET_TIMEOUT_MS: u32 = 150;

/// Decoding stops once the train holds more than this many pulses.
pub const IR_MAX_PULSES: usize = 71;

/// A train longer than this is decoded as a full frame.
pub const IR_REQUIRED_LENGTH: usize = 66;

/// Hard capacity of the pulse train buffer. Edges past this are dropped.
pub const IR_TRAIN_CAPACITY: usize = 128;

/// How often the completion checker re-evaluates a pending train (ms).
pub const IR_COMPLETION_POLL_MS: u64 = 1;

/// Emit the previous code when a repeat burst arrives.
pub const IR_REPEAT_ENABLED: bool = true;

// Remote control
//
// Codes for the seven-button aluminium remote shipped with the DAC.

pub const REMOTE_POWER: u64 = 0x0C77_807F;
pub const REMOTE_MUTE: u64 = 0x0C77_40BF;
pub const REMOTE_LEFT: u64 = 0x0C77_906F;
pub const REMOTE_OK: u64 = 0x0C77_30CF;
pub const REMOTE_UP: u64 = 0x0C77_20DF;
pub const REMOTE_DOWN: u64 = 0x0C77_A05F;
pub const REMOTE_RIGHT: u64 = 0x0C77_10EF;

/// Default mapping from remote codes to panel actions.
///
/// The power key has no action; it only wakes the panel.
pub const REMOTE_KEY_TABLE: [(u64, Action); 6] = [
    (REMOTE_MUTE, Action::Mute),
    (REMOTE_LEFT, Action::Left),
    (REMOTE_OK, Action::Ok),
    (REMOTE_UP, Action::Up),
    (REMOTE_DOWN, Action::Down),
    (REMOTE_RIGHT, Action::Right),
];

/// Remote codes with no action that still wake the panel.
pub const REMOTE_WAKE_CODES: [u64; 1] = [REMOTE_POWER];

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   IR receiver    → P0.03
//   Button LEFT    → P0.11
//   Button OK      → P0.12
//   Button UP      → P0.24
//   Button DOWN    → P0.25
//   Button RIGHT   → P0.04
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

// Front panel

/// Settle time after a routed action before inputs are polled again (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 100;

/// Front-panel polling loop period (ms).
pub const PANEL_TICK_MS: u64 = 20;

/// The INFO screen re-reads volume and stream format every N ticks.
pub const INFO_REFRESH_TICKS: u8 = 10;

/// Duration of the start-up splash screen (seconds).
pub const SPLASH_SCREEN_SECS: u64 = 5;

/// Enable automatic OLED screen power-off after inactivity.
pub const SCREEN_AUTO_OFF_ENABLED: bool = true;

/// Inactivity timeout before OLED is turned off (ms).
pub const SCREEN_AUTO_OFF_TIMEOUT_MS: u64 = 30_000;

/// An open audio stream counts as activity for the screen timeout.
pub const SCREEN_AWAKE_WHILE_STREAMING: bool = true;

/// Card name shown on the splash and system-info screens.
pub const CARD_NAME: &str = "BOSS2";

/// Tunable parameters of the pulse decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderConfig {
    /// Stop accumulating after this long (ms).
    pub quiet_timeout_ms: u32,
    /// Stop accumulating once the train is longer than this.
    pub max_pulses: usize,
    /// Trains longer than this are decoded as full frames.
    pub required_length: usize,
    /// Resolve repeat bursts to the previous code.
    pub repeat_enabled: bool,
    /// Dump widths and bits of every decoded frame.
    pub verbose: bool,
}

impl DecoderConfig {
    /// Defaults matching the shipped remote.
    pub const fn new() -> Self {
        Self {
            quiet_timeout_ms: IR_QUIET_TIMEOUT_MS,
            max_pulses: IR_MAX_PULSES,
            required_length: IR_REQUIRED_LENGTH,
            repeat_enabled: IR_REPEAT_ENABLED,
            verbose: false,
        }
    }

    pub const fn with_quiet_timeout_ms(mut self, quiet_timeout_ms: u32) -> Self {
        self.quiet_timeout_ms = quiet_timeout_ms;
        self
    }

    /// The cap is kept below the train capacity so a completed train always
    /// fits in the buffer.
    pub const fn with_max_pulses(mut self, max_pulses: usize) -> Self {
        self.max_pulses = if max_pulses < IR_TRAIN_CAPACITY {
            max_pulses
        } else {
            IR_TRAIN_CAPACITY - 1
        };
        self
    }

    pub const fn with_required_length(mut self, required_length: usize) -> Self {
        self.required_length = required_length;
        self
    }

    pub const fn with_repeat(mut self, repeat_enabled: bool) -> Self {
        self.repeat_enabled = repeat_enabled;
        self
    }

    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

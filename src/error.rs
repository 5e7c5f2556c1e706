//! Unified error type for dac-panel.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use crate::mixer::MixerControl;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Top-level error type used across the application.
///
/// None of these are fatal: the front-panel loop logs them and carries on
/// with the last known state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // UI / Display
    /// I²C transaction to the display failed.
    Display,

    // Mixer
    /// Reading or writing a mixer switch failed.
    Mixer(MixerControl),

    /// Reading or writing the volume level failed.
    MixerVolume,

    /// The stream format could not be read.
    MixerFormat,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::BufferOverflow
    }
}

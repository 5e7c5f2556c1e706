//! Infrared remote-control input.
//!
//! The receiver output is a train of edges. Each edge is turned into a
//! pulse width by [`PulseTimer`], collected by the [`PulseDecoder`] until
//! the burst is over, then classified and decoded into a [`CommandCode`].
//!
//! ## Components
//!
//! - **decode**: pure frame decoding and train classification
//! - **decoder**: the IDLE / ACCUMULATING state machine owning the train
//! - **shared**: the edge-handler / completion-checker handoff plus the
//!   replaceable code callback
//! - **receiver**: Embassy tasks driving the above from a GPIO pin
//!   (embedded only)

pub mod decode;
pub mod decoder;
pub mod shared;

#[cfg(feature = "embedded")]
pub mod receiver;


pub use decode::{classify, decode_frame, DecodedFrame};
pub use decoder::{EdgeOutcome, PulseDecoder};
pub use shared::{CodeSink, SharedDecoder};

/// One measured pulse: the time between two consecutive edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseSample {
    /// Sequence number of the edge that closed this pulse.
    pub edge_index: u32,
    /// Time since the previous edge (µs).
    pub width_us: u32,
}

/// Result of one completed transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandCode {
    /// Nothing usable was received.
    None,
    /// A short burst meaning "the button is still held".
    Repeat,
    /// A decoded frame.
    Code(u64),
}

impl CommandCode {
    /// The decoded value, if any.
    pub fn value(self) -> Option<u64> {
        match self {
            CommandCode::Code(code) => Some(code),
            CommandCode::None | CommandCode::Repeat => None,
        }
    }
}

/// Turns edge timestamps into pulse widths.
///
/// Runs in the edge-notification context: no allocation, no blocking.
#[derive(Debug)]
pub struct PulseTimer {
    last_edge_us: u64,
    edge_index: u32,
}

impl PulseTimer {
    /// Start timing from `now_us`. The first edge measures from here, which
    /// yields an arbitrary width the decoder treats as noise.
    pub const fn new(now_us: u64) -> Self {
        Self {
            last_edge_us: now_us,
            edge_index: 0,
        }
    }

    /// Record an edge at `now_us` and return the width since the last one.
    pub fn on_edge(&mut self, now_us: u64) -> PulseSample {
        let elapsed = now_us.saturating_sub(self.last_edge_us);
        self.last_edge_us = now_us;
        self.edge_index = self.edge_index.wrapping_add(1);
        PulseSample {
            edge_index: self.edge_index,
            width_us: u32::try_from(elapsed).unwrap_or(u32::MAX),
        }
    }
}

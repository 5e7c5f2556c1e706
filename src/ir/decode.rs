//! Pulse-train classification and frame decoding.
//!
//! Widths are in microseconds. A frame is a leader (long mark + space)
//! followed by mark/space pairs; the space length carries the bit.
//!
//! ```text
//! [noise...][leader mark][leader space][mark][space][mark][space]...
//!             4..12 ms      2..6 ms       bit 0: space < 0.9 ms
//!                                         bit 1: space < 2.5 ms
//! ```

use super::CommandCode;
use crate::config::DecoderConfig;

/// First width below this marks the provisional frame start.
const START_BELOW: u32 = 11_000;
/// Accepted leader mark.
const LEADER_MARK: (u32, u32) = (4_000, 12_000);
/// Accepted leader space.
const LEADER_SPACE: (u32, u32) = (2_000, 6_000);
/// Spaces shorter than this are a 0 bit.
const BIT0_BELOW: u32 = 900;
/// Spaces shorter than this (and not a 0) are a 1 bit.
const BIT1_BELOW: u32 = 2_500;

/// Repeat bursts are longer than this ...
const REPEAT_MIN_EXCLUSIVE: usize = 3;
/// ... and shorter than this.
const REPEAT_MAX_EXCLUSIVE: usize = 10;

/// A successfully decoded frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedFrame {
    /// Bits packed MSB-first in arrival order.
    pub code: u64,
    /// How many bits were collected.
    pub bits: u8,
}

#[inline]
fn in_window(x: u32, window: (u32, u32)) -> bool {
    x >= window.0 && x < window.1
}

/// Decode a full frame.
///
/// Returns `None` if no leader can be found or it has the wrong shape.
/// Bit collection stops at the first space that is not a bit.
pub fn decode_frame(widths: &[u32]) -> Option<DecodedFrame> {
    let start = widths.iter().position(|&w| w < START_BELOW)?;
    let mark = widths[start];
    let space = *widths.get(start + 1)?;

    if !in_window(mark, LEADER_MARK) || !in_window(space, LEADER_SPACE) {
        return None;
    }

    let mut code: u64 = 0;
    let mut bits: u8 = 0;
    for pair in widths[start + 2..].chunks_exact(2) {
        let bit = match pair[1] {
            w if w < BIT0_BELOW => 0,
            w if w < BIT1_BELOW => 1,
            // Inter-frame gap (< 45 ms) or a dropout: the frame is over.
            _ => break,
        };
        code = (code << 1) | bit;
        bits = bits.saturating_add(1);
    }

    Some(DecodedFrame { code, bits })
}

/// Classify a finished train.
///
/// Long trains are decoded, short bursts are repeats, anything else is
/// noise. Repeat resolution is left to the caller.
pub fn classify(widths: &[u32], config: &DecoderConfig) -> CommandCode {
    let len = widths.len();
    if len > config.required_length {
        match decode_frame(widths) {
            Some(frame) => CommandCode::Code(frame.code),
            None => CommandCode::None,
        }
    } else if len > REPEAT_MIN_EXCLUSIVE && len < REPEAT_MAX_EXCLUSIVE {
        CommandCode::Repeat
    } else {
        CommandCode::None
    }
}

//! Pulse accumulation state machine.
//!
//! ```text
//!            edge                      timeout or cap
//!   IDLE ───────────► ACCUMULATING ─────────────────► (classify) ──► IDLE
//!                       ▲      │ edge
//!                       └──────┘
//! ```
//!
//! The decoder never looks at sample values while accumulating; it only
//! watches the train length and the elapsed time. Once accumulation stops
//! the train is handed over whole to the classifier.

use heapless::Vec;

use super::decode::classify;
use super::{CommandCode, PulseSample};
use crate::config::{DecoderConfig, IR_TRAIN_CAPACITY};

/// Fixed-capacity pulse train (widths in µs).
pub type PulseTrain = Vec<u32, IR_TRAIN_CAPACITY>;

/// What an edge did to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// First edge of a new transmission; the completion checker must be woken.
    Started,
    /// Appended to the transmission in progress.
    Appended,
    /// The train just went over the pulse cap; completion is due now.
    CapReached,
    /// The buffer is full and the width was discarded.
    Dropped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Accumulating { started_us: u64 },
}

/// Collects one transmission at a time and turns it into a [`CommandCode`].
#[derive(Debug)]
pub struct PulseDecoder {
    config: DecoderConfig,
    train: PulseTrain,
    phase: Phase,
    last_code: CommandCode,
}

impl PulseDecoder {
    pub const fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            train: Vec::new(),
            phase: Phase::Idle,
            last_code: CommandCode::None,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Takes effect from the next transmission on.
    pub fn set_config(&mut self, config: DecoderConfig) {
        self.config = config;
    }

    pub fn is_accumulating(&self) -> bool {
        matches!(self.phase, Phase::Accumulating { .. })
    }

    /// Number of widths collected for the transmission in progress.
    pub fn len(&self) -> usize {
        self.train.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty()
    }

    /// The last non-repeat result, used to resolve repeat bursts.
    pub fn last_code(&self) -> CommandCode {
        self.last_code
    }

    /// Append one pulse width. Never blocks and never inspects old samples.
    pub fn on_edge(&mut self, sample: PulseSample, now_us: u64) -> EdgeOutcome {
        let started = match self.phase {
            Phase::Idle => {
                self.train.clear();
                self.phase = Phase::Accumulating { started_us: now_us };
                true
            }
            Phase::Accumulating { .. } => false,
        };

        if self.train.push(sample.width_us).is_err() {
            return EdgeOutcome::Dropped;
        }

        if started {
            EdgeOutcome::Started
        } else if self.train.len() == self.config.max_pulses + 1 {
            EdgeOutcome::CapReached
        } else {
            EdgeOutcome::Appended
        }
    }

    /// Instant (µs) at which the quiet timeout expires, if accumulating.
    pub fn deadline_us(&self) -> Option<u64> {
        match self.phase {
            Phase::Idle => None,
            Phase::Accumulating { started_us } => {
                Some(started_us + u64::from(self.config.quiet_timeout_ms) * 1_000)
            }
        }
    }

    /// Whether accumulation should stop: the timeout has passed or the
    /// train is over the cap.
    pub fn completion_due(&self, now_us: u64) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Accumulating { started_us } => {
                let elapsed_us = now_us.saturating_sub(started_us);
                elapsed_us > u64::from(self.config.quiet_timeout_ms) * 1_000
                    || self.train.len() > self.config.max_pulses
            }
        }
    }

    /// Stop accumulating and hand the train over. The decoder is IDLE
    /// afterwards and the next edge starts a fresh train.
    pub fn take_train(&mut self) -> Option<PulseTrain> {
        match self.phase {
            Phase::Idle => None,
            Phase::Accumulating { .. } => {
                self.phase = Phase::Idle;
                Some(core::mem::take(&mut self.train))
            }
        }
    }

    /// Turn a classification into the code to deliver and remember it.
    pub fn resolve(&mut self, classified: CommandCode) -> CommandCode {
        match classified {
            CommandCode::Repeat if self.config.repeat_enabled => self.last_code,
            CommandCode::Repeat => {
                self.last_code = CommandCode::None;
                CommandCode::None
            }
            code => {
                self.last_code = code;
                code
            }
        }
    }

    /// Stop, classify and resolve in one go.
    ///
    /// Returns `None` if no transmission was in progress.
    pub fn finish(&mut self) -> Option<CommandCode> {
        let train = self.take_train()?;
        let classified = classify(&train, &self.config);
        Some(self.resolve(classified))
    }
}

impl Default for PulseDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::new())
    }
}

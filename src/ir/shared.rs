//! Handoff between the edge handler and the completion checker.
//!
//! Two contexts touch the decoder:
//!
//! - the **edge handler** (GPIO edge task) appends widths and must never
//!   wait on anything slower than a short critical section;
//! - the **completion checker** wakes when a transmission starts, watches
//!   the length / elapsed time, then takes the whole train, classifies it
//!   and delivers the result.
//!
//! The train is only ever read by the classifier after it has been taken
//! out of the decoder, so the edge handler can start the next transmission
//! straight away. The registered [`CodeSink`] is read at delivery time and
//! invoked with no lock held.

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::decode::classify;
use super::decoder::{EdgeOutcome, PulseDecoder};
use super::{CommandCode, PulseSample};
use crate::config::DecoderConfig;

/// Where decoded codes go.
#[derive(Clone, Copy, Debug)]
pub enum CodeSink {
    /// No callback registered; codes are dropped.
    Detached,
    /// Log every code in hex.
    DebugPrint,
    /// User handler. Runs in the completion checker's context.
    Custom(fn(CommandCode)),
}

/// A [`PulseDecoder`] that can live in a `static` and be shared between
/// the edge handler and the completion checker.
pub struct SharedDecoder {
    decoder: Mutex<CriticalSectionRawMutex, RefCell<PulseDecoder>>,
    sink: Mutex<CriticalSectionRawMutex, Cell<CodeSink>>,
    decoding: AtomicBool,
}

impl SharedDecoder {
    pub const fn new(config: DecoderConfig, sink: CodeSink) -> Self {
        Self {
            decoder: Mutex::new(RefCell::new(PulseDecoder::new(config))),
            sink: Mutex::new(Cell::new(sink)),
            decoding: AtomicBool::new(false),
        }
    }

    /// Edge handler entry point.
    pub fn on_edge(&self, sample: PulseSample, now_us: u64) -> EdgeOutcome {
        self.decoder.lock(|decoder| {
            let outcome = decoder.borrow_mut().on_edge(sample, now_us);
            if outcome == EdgeOutcome::Started {
                self.decoding.store(true, Ordering::Release);
            }
            outcome
        })
    }

    /// True while a transmission is being accumulated.
    pub fn is_decoding(&self) -> bool {
        self.decoding.load(Ordering::Acquire)
    }

    /// Quiet-timeout deadline (µs) of the transmission in progress.
    pub fn deadline_us(&self) -> Option<u64> {
        self.decoder.lock(|decoder| decoder.borrow().deadline_us())
    }

    /// One completion-checker step: finish the transmission if it is due.
    pub fn poll(&self, now_us: u64) -> Option<CommandCode> {
        let due = self
            .decoder
            .lock(|decoder| decoder.borrow().completion_due(now_us));
        if due {
            self.finish()
        } else {
            None
        }
    }

    /// Stop accumulating, classify the train and deliver the result.
    ///
    /// Returns `None` if nothing was being accumulated.
    pub fn finish(&self) -> Option<CommandCode> {
        let (train, config) = self.decoder.lock(|decoder| {
            let mut decoder = decoder.borrow_mut();
            let train = decoder.take_train()?;
            self.decoding.store(false, Ordering::Release);
            Some((train, *decoder.config()))
        })?;

        let classified = classify(&train, &config);

        #[cfg(feature = "defmt")]
        if config.verbose {
            defmt::debug!("IR train ({=usize}): {=[?]}", train.len(), &train[..]);
            if let Some(frame) = super::decode::decode_frame(&train) {
                defmt::debug!("IR bits: {=u8} -> {=u64:#x}", frame.bits, frame.code);
            }
        }

        let code = self
            .decoder
            .lock(|decoder| decoder.borrow_mut().resolve(classified));
        self.deliver(code);
        Some(code)
    }

    /// Replace the callback. An in-flight transmission is delivered to
    /// whichever sink is registered when it completes.
    pub fn set_callback(&self, sink: CodeSink) {
        self.sink.lock(|cell| cell.set(sink));
    }

    pub fn clear_callback(&self) {
        self.set_callback(CodeSink::Detached);
    }

    pub fn set_repeat(&self, repeat_enabled: bool) {
        self.update_config(|config| config.with_repeat(repeat_enabled));
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.update_config(|config| config.with_verbose(verbose));
    }

    pub fn config(&self) -> DecoderConfig {
        self.decoder.lock(|decoder| *decoder.borrow().config())
    }

    fn update_config(&self, f: impl FnOnce(DecoderConfig) -> DecoderConfig) {
        self.decoder.lock(|decoder| {
            let mut decoder = decoder.borrow_mut();
            let config = f(*decoder.config());
            decoder.set_config(config);
        });
    }

    fn deliver(&self, code: CommandCode) {
        let sink = self.sink.lock(Cell::get);
        match sink {
            CodeSink::Custom(handler) => handler(code),
            CodeSink::DebugPrint => {
                #[cfg(feature = "defmt")]
                print_code(code);
            }
            CodeSink::Detached => {
                #[cfg(feature = "defmt")]
                defmt::debug!("IR code {} dropped: no callback registered", code);
            }
        }
    }
}

#[cfg(feature = "defmt")]
fn print_code(code: CommandCode) {
    match code {
        CommandCode::Code(value) => defmt::info!("IR code: {=u64:#x}", value),
        other => defmt::info!("IR code: {}", other),
    }
}

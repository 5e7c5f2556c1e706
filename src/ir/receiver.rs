//! IR receiver tasks - edge capture and decode completion.
//!
//! The edge task only timestamps edges and appends widths; it never waits
//! on the display bus or sleeps. The completion task is woken when a
//! transmission starts and finishes it when the quiet timeout expires or
//! the pulse cap is crossed, whichever comes first.

use defmt::{info, warn};
use embassy_futures::select::select;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use crate::config::IR_COMPLETION_POLL_MS;
use crate::ir::{EdgeOutcome, PulseTimer, SharedDecoder};

static TRAIN_STARTED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
static CAP_REACHED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Timestamp every edge on the IR pin and feed the decoder.
#[embassy_executor::task]
pub async fn edge_task(pin: AnyPin, decoder: &'static SharedDecoder) -> ! {
    // IR receiver modules idle HIGH and pull LOW while a carrier is seen.
    let mut input = Input::new(pin, Pull::Up);
    let mut timer = PulseTimer::new(Instant::now().as_micros());

    info!("IR edge task started");
    loop {
        input.wait_for_any_edge().await;

        let now = Instant::now().as_micros();
        let sample = timer.on_edge(now);
        match decoder.on_edge(sample, now) {
            EdgeOutcome::Started => TRAIN_STARTED.signal(()),
            EdgeOutcome::CapReached => CAP_REACHED.signal(()),
            EdgeOutcome::Appended => {}
            EdgeOutcome::Dropped => warn!("IR: train full, edge {} dropped", sample.edge_index),
        }
    }
}

/// Finish each transmission and hand its code to the registered sink.
#[embassy_executor::task]
pub async fn completion_task(decoder: &'static SharedDecoder) -> ! {
    info!("IR completion task started");
    loop {
        TRAIN_STARTED.wait().await;
        CAP_REACHED.reset();

        if let Some(deadline) = decoder.deadline_us() {
            select(Timer::at(Instant::from_micros(deadline)), CAP_REACHED.wait()).await;
        }

        // The timeout is exclusive, so keep stepping at poll granularity
        // until the decoder agrees the transmission is over.
        while decoder.is_decoding() {
            if decoder.poll(Instant::now().as_micros()).is_some() {
                break;
            }
            Timer::after(Duration::from_millis(IR_COMPLETION_POLL_MS)).await;
        }
    }
}

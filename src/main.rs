//! dac-panel - DAC front-panel firmware for nRF52840.
//!
//! Architecture:
//!   IR edge task ──► SharedDecoder ──► completion task ──► CodeSink
//!                                                           │
//!                          PendingActions ◄── CommandRouter ◄┘
//!                                │
//!   Buttons ──► panel loop ◄─────┘ ──► MenuStateMachine ──► OLED
//!
//! The edge task only timestamps edges. Decoding finishes in its own
//! task, and the panel loop is the only place that touches the I²C bus.

#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin as _;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use dac_panel::config::{
    DecoderConfig, BUTTON_DEBOUNCE_MS, PANEL_TICK_MS, REMOTE_KEY_TABLE, REMOTE_WAKE_CODES,
    SPLASH_SCREEN_SECS,
};
use dac_panel::ir::{receiver, CodeSink, CommandCode, SharedDecoder};
use dac_panel::mixer::SoftMixer;
use dac_panel::panel::FrontPanel;
use dac_panel::router::{ButtonInput, CommandRouter, KeyMap, PendingActions};
use dac_panel::ui::buttons::PanelButtons;
use dac_panel::ui::display::OledDisplay;
use dac_panel::ui::SysInfo;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Codes are logged until the panel is up, then routed.
static DECODER: SharedDecoder = SharedDecoder::new(DecoderConfig::new(), CodeSink::DebugPrint);
static PENDING: PendingActions = PendingActions::new();
static ROUTER: CommandRouter<'static> = CommandRouter::new(KeyMap::new(&REMOTE_KEY_TABLE), &PENDING)
    .with_wake_codes(&REMOTE_WAKE_CODES);

fn on_remote_code(code: CommandCode) {
    ROUTER.route_code(code);
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("dac-panel starting");

    // - IR receiver ------------------------------------------------
    unwrap!(spawner.spawn(receiver::edge_task(p.P0_03.degrade(), &DECODER)));
    unwrap!(spawner.spawn(receiver::completion_task(&DECODER)));

    // - OLED -------------------------------------------------------
    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    let display = unwrap!(OledDisplay::new(i2c));

    let sys_info = SysInfo::new("dac-panel", "eth0: NA", "wlan0: NA");
    let mut panel = FrontPanel::new(display, SoftMixer::new(), sys_info, now_ms());
    if let Err(err) = panel.splash() {
        warn!("Splash screen failed: {}", err);
    }
    Timer::after(Duration::from_secs(SPLASH_SCREEN_SECS)).await;

    // - Front panel ------------------------------------------------
    let mut buttons = PanelButtons::new(
        p.P0_11.degrade(),
        p.P0_04.degrade(),
        p.P0_24.degrade(),
        p.P0_25.degrade(),
        p.P0_12.degrade(),
    );

    DECODER.set_callback(CodeSink::Custom(on_remote_code));
    panel.start(now_ms());
    info!("Front panel ready");

    loop {
        let states = buttons.poll_states();
        if states.any() || ROUTER.take_activity() {
            panel.touch(now_ms());
        }

        for action in ROUTER.collect(states) {
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
            panel.dispatch(action, now_ms());
        }

        panel.tick(now_ms());
        Timer::after(Duration::from_millis(PANEL_TICK_MS)).await;
    }
}

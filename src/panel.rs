//! Front panel - ties the menu, the inactivity timer and the capabilities
//! together.
//!
//! The firmware's panel task owns one [`FrontPanel`]. Each loop iteration
//! it dispatches whatever the [`CommandRouter`](crate::router::CommandRouter)
//! collected, then calls [`FrontPanel::tick`].

use crate::config::{
    CARD_NAME, SCREEN_AUTO_OFF_ENABLED, SCREEN_AUTO_OFF_TIMEOUT_MS, SCREEN_AWAKE_WHILE_STREAMING,
};
use crate::inactivity::{InactivityTimer, PowerChange};
use crate::mixer::Mixer;
use crate::router::Action;
use crate::ui::{render, Display, MenuStateMachine, SysInfo, UiState};
use crate::Result;

pub struct FrontPanel<D, M> {
    display: D,
    mixer: M,
    machine: MenuStateMachine,
    timer: InactivityTimer,
    awake_while_streaming: bool,
}

impl<D: Display, M: Mixer> FrontPanel<D, M> {
    /// Panel with the default screen timeout policy.
    pub fn new(display: D, mixer: M, sys_info: SysInfo, now_ms: u64) -> Self {
        Self {
            display,
            mixer,
            machine: MenuStateMachine::new(sys_info),
            timer: InactivityTimer::new(now_ms, SCREEN_AUTO_OFF_TIMEOUT_MS, SCREEN_AUTO_OFF_ENABLED),
            awake_while_streaming: SCREEN_AWAKE_WHILE_STREAMING,
        }
    }

    /// Override the screen timeout policy.
    pub fn with_screen_timeout(mut self, now_ms: u64, timeout_ms: u64, auto_off_enabled: bool) -> Self {
        self.timer = InactivityTimer::new(now_ms, timeout_ms, auto_off_enabled);
        self
    }

    pub fn with_awake_while_streaming(mut self, enabled: bool) -> Self {
        self.awake_while_streaming = enabled;
        self
    }

    /// Show the start-up screen. The caller decides how long it stays up.
    pub fn splash(&mut self) -> Result<()> {
        self.display.clear()?;
        render::draw_splash(&mut self.display, CARD_NAME, self.machine.sys_info())?;
        self.display.power_on()
    }

    /// Load the settings from the mixer and open the INFO screen.
    pub fn start(&mut self, now_ms: u64) {
        self.machine.sync_settings(&mut self.mixer);
        self.machine.redraw_all(&mut self.display, &mut self.mixer);
        self.timer = self.timer.restarted(now_ms);
        self.apply(PowerChange::On);
        #[cfg(feature = "defmt")]
        defmt::info!("Panel: started, settings {}", self.machine.state().settings);
    }

    /// Record input activity without an action.
    pub fn touch(&mut self, now_ms: u64) {
        if let Some(change) = self.timer.touch(now_ms) {
            self.apply(change);
        }
    }

    /// Route one action: push the screen deadline back, then let the menu
    /// handle it.
    pub fn dispatch(&mut self, action: Action, now_ms: u64) {
        self.touch(now_ms);
        self.machine.handle(action, &mut self.display, &mut self.mixer);
    }

    /// Periodic step: INFO refresh and screen timeout.
    pub fn tick(&mut self, now_ms: u64) {
        let stream = self.machine.tick(&mut self.display, &mut self.mixer);
        if self.awake_while_streaming && stream.is_some_and(|s| s.is_open()) {
            self.touch(now_ms);
        }
        if let Some(change) = self.timer.tick(now_ms) {
            self.apply(change);
        }
    }

    /// Power the panel off and blank it.
    pub fn shutdown(&mut self) {
        let result = self.display.power_off().and_then(|()| self.display.clear());
        if let Err(_err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("Panel: unable to clear display: {}", _err);
        }
    }

    pub fn state(&self) -> &UiState {
        self.machine.state()
    }

    pub fn display_on(&self) -> bool {
        self.timer.display_on()
    }

    /// The instant (ms) the screen goes to sleep without further input.
    pub fn sleep_deadline_ms(&self) -> u64 {
        self.timer.deadline_ms()
    }

    pub fn set_sys_info(&mut self, sys_info: SysInfo) {
        self.machine.set_sys_info(sys_info);
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut M {
        &mut self.mixer
    }

    fn apply(&mut self, change: PowerChange) {
        if let Err(_err) = change.apply(&mut self.display) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Panel: display power {} failed: {}", change, _err);
        }
    }
}

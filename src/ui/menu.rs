//! Menu state machine.
//!
//! Owns the whole UI state. Every routed [`Action`] goes through
//! [`MenuStateMachine::handle`], which updates the state, talks to the
//! mixer and redraws. Capability failures are logged and the state machine
//! carries on with its cached values; nothing here can stop the panel loop.

use super::input_logic::{select_next, select_prev, MENU_ITEMS};
use super::render::{self, InfoView};
use super::{Display, Screen, Setting, SysInfo};
use crate::config::{CARD_NAME, INFO_REFRESH_TICKS};
use crate::mixer::{volume_down, volume_up, Mixer, MixerControl, StreamFormat, VolumeLevel};
use crate::router::Action;
use crate::Result;

/// Filter sub-menu entries with their row labels, in cursor order.
pub const FILTER_ITEMS: [(Setting, &str); 4] = [
    (Setting::PhaseCompensation, "PHCOMP "),
    (Setting::HighPass, "HP-FIL "),
    (Setting::DeEmphasis, "DE-EMP "),
    (Setting::NonOversample, "NON-OS "),
];

/// Last known values of the DAC settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub hv_enable: bool,
    /// `true` = fast roll-off.
    pub filter_speed: bool,
    pub high_pass: bool,
    pub de_emphasis: bool,
    pub non_oversample: bool,
    pub phase_compensation: bool,
}

impl Settings {
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::HvEnable => self.hv_enable,
            Setting::FilterSpeed => self.filter_speed,
            Setting::HighPass => self.high_pass,
            Setting::DeEmphasis => self.de_emphasis,
            Setting::NonOversample => self.non_oversample,
            Setting::PhaseCompensation => self.phase_compensation,
        }
    }

    pub fn set(&mut self, setting: Setting, value: bool) {
        let slot = match setting {
            Setting::HvEnable => &mut self.hv_enable,
            Setting::FilterSpeed => &mut self.filter_speed,
            Setting::HighPass => &mut self.high_pass,
            Setting::DeEmphasis => &mut self.de_emphasis,
            Setting::NonOversample => &mut self.non_oversample,
            Setting::PhaseCompensation => &mut self.phase_compensation,
        };
        *slot = value;
    }
}

/// Everything the screens are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiState {
    pub screen: Screen,
    /// 1..=4
    pub menu_cursor: u8,
    /// 1..=4
    pub filter_cursor: u8,
    pub settings: Settings,
    /// Set by UP/DOWN on a toggle screen; locks LEFT until OK.
    pub ok_confirmed: bool,
    pub mute: bool,
}

impl UiState {
    pub const fn new() -> Self {
        Self {
            screen: Screen::Info,
            menu_cursor: 1,
            filter_cursor: 1,
            settings: Settings {
                hv_enable: false,
                filter_speed: false,
                high_pass: false,
                de_emphasis: false,
                non_oversample: false,
                phase_compensation: false,
            },
            ok_confirmed: false,
            mute: false,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen opened by OK on the top menu.
fn menu_target(cursor: u8) -> Option<Screen> {
    match cursor {
        1 => Some(Screen::Boot),
        2 => Some(Screen::Toggle(Setting::HvEnable)),
        3 => Some(Screen::Filter),
        4 => Some(Screen::Toggle(Setting::FilterSpeed)),
        _ => None,
    }
}

/// Setting opened by OK on the filter sub-menu.
fn filter_target(cursor: u8) -> Option<Setting> {
    FILTER_ITEMS
        .get(usize::from(cursor).checked_sub(1)?)
        .map(|&(setting, _)| setting)
}

/// Values last shown on INFO, reused when a read fails.
#[derive(Clone, Copy, Debug, Default)]
struct InfoCache {
    volume: Option<VolumeLevel>,
    /// Sample rate currently drawn, `None` when the field is blank.
    rate: Option<u32>,
}

pub struct MenuStateMachine {
    state: UiState,
    sys_info: SysInfo,
    info: InfoCache,
    ticks: u8,
    refresh_pending: bool,
}

impl MenuStateMachine {
    pub fn new(sys_info: SysInfo) -> Self {
        Self {
            state: UiState::new(),
            sys_info,
            info: InfoCache::default(),
            ticks: 0,
            refresh_pending: false,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn sys_info(&self) -> &SysInfo {
        &self.sys_info
    }

    pub fn set_sys_info(&mut self, sys_info: SysInfo) {
        self.sys_info = sys_info;
    }

    /// Re-read every setting and the mute state from the mixer.
    ///
    /// A failed read keeps the cached value.
    pub fn sync_settings<M: Mixer + ?Sized>(&mut self, mixer: &mut M) {
        for setting in Setting::ALL {
            let read = match setting.control() {
                Some(control) => mixer.switch(control),
                None => mixer.filter_speed(),
            };
            match read {
                Ok(value) => self.state.settings.set(setting, value),
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("UI: {} read failed, keeping cached value: {}", setting, _err);
                }
            }
        }
        self.read_mute(mixer);
    }

    /// Draw the current screen from scratch.
    pub fn redraw_all<D, M>(&mut self, display: &mut D, mixer: &mut M)
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        self.info.rate = None;
        let result = display.clear().and_then(|()| self.redraw(display, mixer));
        if let Err(_err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("UI: redraw failed: {}", _err);
        }
    }

    /// Apply one routed action. Failures are logged; the state stays
    /// consistent with what the mixer last reported.
    pub fn handle<D, M>(&mut self, action: Action, display: &mut D, mixer: &mut M)
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!("UI: {} on {}", action, self.state.screen);
        if let Err(_err) = self.transition(action, display, mixer) {
            #[cfg(feature = "defmt")]
            defmt::warn!("UI: {} failed: {}", action, _err);
        }
    }

    /// Periodic step of the panel loop.
    ///
    /// Every [`INFO_REFRESH_TICKS`] ticks, or sooner after a mute change,
    /// the INFO readout is refreshed from the mixer. Returns the stream
    /// format seen by that refresh.
    pub fn tick<D, M>(&mut self, display: &mut D, mixer: &mut M) -> Option<StreamFormat>
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        self.ticks = self.ticks.saturating_add(1);
        if self.ticks >= INFO_REFRESH_TICKS {
            self.ticks = 0;
            self.refresh_pending = true;
        }
        if !self.refresh_pending || self.state.screen != Screen::Info {
            return None;
        }
        self.refresh_pending = false;
        match self.refresh_info(display, mixer) {
            Ok(stream) => stream,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: INFO refresh failed: {}", _err);
                None
            }
        }
    }

    fn transition<D, M>(&mut self, action: Action, display: &mut D, mixer: &mut M) -> Result<()>
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        match (self.state.screen, action) {
            (screen, Action::Mute) => {
                self.toggle_mute(mixer);
                if screen == Screen::Info {
                    self.refresh_info(display, mixer)?;
                } else {
                    self.refresh_pending = true;
                }
                Ok(())
            }

            (Screen::Info, Action::Left | Action::Right) => self.show(Screen::Menu, display, mixer),
            (Screen::Info, Action::Up) => {
                self.step_volume(mixer, volume_up);
                self.refresh_info(display, mixer).map(drop)
            }
            (Screen::Info, Action::Down) => {
                self.step_volume(mixer, volume_down);
                self.refresh_info(display, mixer).map(drop)
            }
            (Screen::Info, Action::Ok) => {
                self.toggle_mute(mixer);
                self.refresh_info(display, mixer).map(drop)
            }

            (Screen::Menu, Action::Left | Action::Right) => self.show(Screen::Info, display, mixer),
            (Screen::Menu, Action::Up) => {
                self.state.menu_cursor = select_prev(self.state.menu_cursor);
                render::draw_menu(display, &self.state)
            }
            (Screen::Menu, Action::Down) => {
                self.state.menu_cursor = select_next(self.state.menu_cursor, MENU_ITEMS);
                render::draw_menu(display, &self.state)
            }
            (Screen::Menu, Action::Ok) => match menu_target(self.state.menu_cursor) {
                Some(target) => self.show(target, display, mixer),
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("UI: no menu item at cursor {=u8}", self.state.menu_cursor);
                    Ok(())
                }
            },

            (Screen::Boot, Action::Left | Action::Right | Action::Ok) => {
                self.show(Screen::Menu, display, mixer)
            }
            (Screen::Boot, Action::Up | Action::Down) => Ok(()),

            (Screen::Filter, Action::Left | Action::Right) => {
                self.show(Screen::Menu, display, mixer)
            }
            (Screen::Filter, Action::Up) => {
                self.state.filter_cursor = select_prev(self.state.filter_cursor);
                render::draw_filter(display, &self.state)
            }
            (Screen::Filter, Action::Down) => {
                self.state.filter_cursor = select_next(self.state.filter_cursor, MENU_ITEMS);
                render::draw_filter(display, &self.state)
            }
            (Screen::Filter, Action::Ok) => match filter_target(self.state.filter_cursor) {
                Some(setting) => self.show(Screen::Toggle(setting), display, mixer),
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("UI: no filter item at cursor {=u8}", self.state.filter_cursor);
                    Ok(())
                }
            },

            (Screen::Toggle(setting), Action::Left) => {
                if !self.state.ok_confirmed {
                    self.state.settings.set(setting, true);
                }
                self.draw_toggle(setting, display)
            }
            (Screen::Toggle(setting), Action::Right) => {
                self.state.settings.set(setting, false);
                self.draw_toggle(setting, display)
            }
            (Screen::Toggle(setting), Action::Up | Action::Down) => {
                self.state.ok_confirmed = true;
                self.draw_toggle(setting, display)
            }
            (Screen::Toggle(setting), Action::Ok) => {
                self.commit(setting, mixer);
                self.show(setting.parent(), display, mixer)
            }
        }
    }

    /// Switch to `screen`. A new screen is cleared first; the current one
    /// is redrawn in place.
    fn show<D, M>(&mut self, screen: Screen, display: &mut D, mixer: &mut M) -> Result<()>
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        if screen != self.state.screen {
            if let Screen::Toggle(_) = screen {
                self.state.ok_confirmed = false;
            }
            self.state.screen = screen;
            self.info.rate = None;
            display.clear()?;
        }
        self.redraw(display, mixer)
    }

    fn redraw<D, M>(&mut self, display: &mut D, mixer: &mut M) -> Result<()>
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        match self.state.screen {
            Screen::Info => self.refresh_info(display, mixer).map(drop),
            Screen::Menu => render::draw_menu(display, &self.state),
            Screen::Boot => render::draw_boot(display, CARD_NAME, &self.sys_info),
            Screen::Filter => render::draw_filter(display, &self.state),
            Screen::Toggle(setting) => self.draw_toggle(setting, display),
        }
    }

    fn draw_toggle<D: Display + ?Sized>(&self, setting: Setting, display: &mut D) -> Result<()> {
        render::draw_toggle(
            display,
            setting,
            self.state.settings.get(setting),
            self.state.ok_confirmed,
        )
    }

    /// Read volume, mute and stream format and redraw the INFO widgets.
    ///
    /// Values that cannot be read are shown as last seen.
    fn refresh_info<D, M>(&mut self, display: &mut D, mixer: &mut M) -> Result<Option<StreamFormat>>
    where
        D: Display + ?Sized,
        M: Mixer + ?Sized,
    {
        match mixer.volume() {
            Ok(volume) => self.info.volume = Some(volume),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: volume read failed, showing stale value: {}", _err);
            }
        }
        self.read_mute(mixer);
        let stream = match mixer.stream_format() {
            Ok(stream) => Some(stream),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: stream format read failed: {}", _err);
                None
            }
        };

        let rate = stream.and_then(|s| s.is_open().then_some(s.sample_rate));
        let view = InfoView {
            volume: self.info.volume,
            muted: self.state.mute,
            stream,
            rate_changed: rate.is_some() && rate != self.info.rate,
        };
        render::draw_info(display, &view)?;
        if stream.is_some() {
            self.info.rate = rate;
        }
        Ok(stream)
    }

    fn read_mute<M: Mixer + ?Sized>(&mut self, mixer: &mut M) {
        match mixer.switch(MixerControl::Master) {
            Ok(on) => self.state.mute = !on,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: mute read failed: {}", _err);
            }
        }
    }

    /// Flip mute on both output stages.
    fn toggle_mute<M: Mixer + ?Sized>(&mut self, mixer: &mut M) {
        let on = match mixer.switch(MixerControl::Master) {
            Ok(on) => !on,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: mute read failed, not toggling: {}", _err);
                return;
            }
        };
        for control in [MixerControl::Master, MixerControl::Digital] {
            if let Err(_err) = mixer.set_switch(control, on) {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: {} write failed: {}", control, _err);
            }
        }
        self.state.mute = !on;
    }

    fn step_volume<M: Mixer + ?Sized>(&mut self, mixer: &mut M, step: fn(u8) -> u8) {
        let result = mixer
            .volume()
            .and_then(|volume| mixer.set_volume(step(volume.hardware)));
        if let Err(_err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("UI: volume step failed: {}", _err);
        }
    }

    /// Write the edited value if it differs from the mixer, then resync.
    fn commit<M: Mixer + ?Sized>(&mut self, setting: Setting, mixer: &mut M) {
        let wanted = self.state.settings.get(setting);
        let current = match setting.control() {
            Some(control) => mixer.switch(control),
            None => mixer.filter_speed(),
        };
        let changed = match current {
            Ok(current) => current != wanted,
            // Unknown state: write anyway.
            Err(_) => true,
        };
        if changed {
            let written = match setting.control() {
                Some(control) => mixer.set_switch(control, wanted),
                None => mixer.set_filter_speed(wanted),
            };
            if let Err(_err) = written {
                #[cfg(feature = "defmt")]
                defmt::warn!("UI: {} write failed: {}", setting, _err);
            }
        }
        self.state.ok_confirmed = false;
        self.sync_settings(mixer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_targets() {
        assert_eq!(menu_target(1), Some(Screen::Boot));
        assert_eq!(menu_target(2), Some(Screen::Toggle(Setting::HvEnable)));
        assert_eq!(menu_target(3), Some(Screen::Filter));
        assert_eq!(menu_target(4), Some(Screen::Toggle(Setting::FilterSpeed)));
        assert_eq!(menu_target(0), None);
        assert_eq!(menu_target(5), None);
    }

    #[test]
    fn test_filter_targets() {
        assert_eq!(filter_target(1), Some(Setting::PhaseCompensation));
        assert_eq!(filter_target(2), Some(Setting::HighPass));
        assert_eq!(filter_target(3), Some(Setting::DeEmphasis));
        assert_eq!(filter_target(4), Some(Setting::NonOversample));
        assert_eq!(filter_target(0), None);
        assert_eq!(filter_target(5), None);
    }

    #[test]
    fn test_settings_get_set() {
        let mut settings = Settings::default();
        for setting in Setting::ALL {
            assert!(!settings.get(setting));
            settings.set(setting, true);
            assert!(settings.get(setting));
        }
        assert!(settings.hv_enable && settings.phase_compensation);
    }

    #[test]
    fn test_toggle_parents() {
        assert_eq!(Setting::HvEnable.parent(), Screen::Menu);
        assert_eq!(Setting::FilterSpeed.parent(), Screen::Menu);
        for (setting, _) in FILTER_ITEMS {
            assert_eq!(setting.parent(), Screen::Filter);
        }
    }
}

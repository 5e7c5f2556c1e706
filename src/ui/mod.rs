//! User interface subsystem - OLED display + menu state machine.
//!
//! The panel loop feeds routed actions into the [`MenuStateMachine`],
//! which mutates its [`UiState`] and redraws through the [`Display`]
//! capability.
//!
//! ## Components
//!
//! - **Menu**: screen transitions and setting toggles
//! - **Render**: state to text placement on the 8-page panel
//! - **Display**: SSD1306-class 128×64 OLED via I²C (embedded only)
//! - **Buttons**: 5 active-low tactile switches (embedded only)

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;
pub mod input_logic;
pub mod menu;
pub mod render;

pub use menu::{MenuStateMachine, Settings, UiState};

use heapless::String;

use crate::mixer::MixerControl;
use crate::Result;

/// Text capability of the panel.
///
/// `row` is an 8-pixel page (0..=7), `col` a pixel column.
pub trait Display {
    fn clear(&mut self) -> Result<()>;
    fn set_power(&mut self, on: bool) -> Result<()>;
    fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<()>;
    /// Same as [`Display::write_text`] with foreground and background swapped.
    fn write_inverted(&mut self, text: &str, row: u8, col: u8) -> Result<()>;

    fn power_on(&mut self) -> Result<()> {
        self.set_power(true)
    }

    fn power_off(&mut self) -> Result<()> {
        self.set_power(false)
    }
}

/// Screens (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Home - volume, mute and stream format.
    Info,
    /// Top menu.
    Menu,
    /// Read-only host and network information.
    Boot,
    /// Filter sub-menu.
    Filter,
    /// Edit one setting with an explicit OK.
    Toggle(Setting),
}

/// Boolean DAC settings editable from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    HvEnable,
    FilterSpeed,
    HighPass,
    DeEmphasis,
    NonOversample,
    PhaseCompensation,
}

/// Labels and positions of a toggle-detail screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleLayout {
    pub title: &'static str,
    pub title_col: u8,
    pub on_label: &'static str,
    pub on_col: u8,
    pub off_label: &'static str,
    pub off_col: u8,
}

impl Setting {
    pub const ALL: [Setting; 6] = [
        Setting::HvEnable,
        Setting::FilterSpeed,
        Setting::HighPass,
        Setting::DeEmphasis,
        Setting::NonOversample,
        Setting::PhaseCompensation,
    ];

    /// Screen the OK commit returns to.
    pub const fn parent(self) -> Screen {
        match self {
            Setting::HvEnable | Setting::FilterSpeed => Screen::Menu,
            Setting::HighPass
            | Setting::DeEmphasis
            | Setting::NonOversample
            | Setting::PhaseCompensation => Screen::Filter,
        }
    }

    /// Mixer switch backing this setting. Filter speed has its own call.
    pub const fn control(self) -> Option<MixerControl> {
        match self {
            Setting::HvEnable => Some(MixerControl::HvEnable),
            Setting::FilterSpeed => None,
            Setting::HighPass => Some(MixerControl::HighPass),
            Setting::DeEmphasis => Some(MixerControl::DeEmphasis),
            Setting::NonOversample => Some(MixerControl::NonOversample),
            Setting::PhaseCompensation => Some(MixerControl::PhaseCompensation),
        }
    }

    pub const fn layout(self) -> ToggleLayout {
        const ENABLE: (&str, u8, &str, u8) = ("EN", 10, "DIS", 70);
        let (title, title_col, (on_label, on_col, off_label, off_col)) = match self {
            Setting::HvEnable => ("HV ENABLE", 20, ("ON", 20, "OFF", 70)),
            Setting::FilterSpeed => ("FILTER SPEED", 5, ("FAST", 10, "SLOW", 80)),
            Setting::HighPass => ("HP-FILT", 20, ENABLE),
            Setting::DeEmphasis => ("DE-EMPH", 20, ENABLE),
            Setting::NonOversample => ("NON-OSAMP", 20, ENABLE),
            Setting::PhaseCompensation => ("PHA-COMP", 20, ENABLE),
        };
        ToggleLayout {
            title,
            title_col,
            on_label,
            on_col,
            off_label,
            off_col,
        }
    }
}

/// Host details shown on the splash and BOOT screens.
///
/// Filled in by the host; the panel never looks them up itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SysInfo {
    pub host_name: String<20>,
    pub lan_address: String<20>,
    pub wlan_address: String<20>,
}

impl SysInfo {
    /// Build from borrowed strings, truncating each to its capacity.
    pub fn new(host_name: &str, lan_address: &str, wlan_address: &str) -> Self {
        Self {
            host_name: truncated(host_name),
            lan_address: truncated(lan_address),
            wlan_address: truncated(wlan_address),
        }
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

//! Screen layouts.
//!
//! Each `draw_*` function writes one screen's widgets through the
//! [`Display`] capability. None of them clear the panel; the state machine
//! clears on screen changes and redraws in place otherwise. Selected items
//! are drawn inverted.

use core::fmt::Write as _;

use heapless::String;

use super::menu::{UiState, FILTER_ITEMS};
use super::{Display, Setting, SysInfo};
use crate::mixer::{StreamFormat, VolumeLevel};
use crate::{Error, Result};

/// Characters in the widest volume reading, `-127.50dB`.
pub const VOLUME_FIELD_CHARS: usize = 9;

/// What the INFO screen shows on one refresh.
///
/// `None` fields could not be read and are left as last drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfoView {
    pub volume: Option<VolumeLevel>,
    pub muted: bool,
    pub stream: Option<StreamFormat>,
    /// Blank the sample-rate field before writing it.
    pub rate_changed: bool,
}

fn write_item<D: Display + ?Sized>(
    display: &mut D,
    text: &str,
    row: u8,
    col: u8,
    selected: bool,
) -> Result<()> {
    if selected {
        display.write_inverted(text, row, col)
    } else {
        display.write_text(text, row, col)
    }
}

/// Home screen: volume, mute marker and stream format.
pub fn draw_info<D: Display + ?Sized>(display: &mut D, view: &InfoView) -> Result<()> {
    if let Some(volume) = view.volume {
        let mut text: String<16> = String::new();
        write!(text, "{:.2}dB", volume.left_db)?;
        // Pad to the widest reading so a shorter one covers the old tail.
        while text.len() < VOLUME_FIELD_CHARS {
            text.push(' ').map_err(|_| Error::BufferOverflow)?;
        }
        display.write_text(&text, 1, 20)?;
    }

    display.write_text(if view.muted { "@" } else { "  " }, 3, 50)?;

    match view.stream {
        Some(stream) => draw_stream(display, stream, view.rate_changed),
        None => Ok(()),
    }
}

fn draw_stream<D: Display + ?Sized>(
    display: &mut D,
    stream: StreamFormat,
    rate_changed: bool,
) -> Result<()> {
    match stream.format.depth_label() {
        Some(depth) => {
            display.write_text(depth, 5, 15)?;
            display.write_text("S", 5, 5)?;
            if rate_changed {
                display.write_text("        ", 5, 50)?;
            }
            let mut rate: String<12> = String::new();
            write!(rate, "{}", stream.sample_rate)?;
            display.write_text(&rate, 5, 50)
        }
        None => {
            display.write_text("   ", 5, 15)?;
            display.write_text(" ", 5, 5)?;
            display.write_text("        ", 5, 50)
        }
    }
}

/// Top menu with the cursor item highlighted.
pub fn draw_menu<D: Display + ?Sized>(display: &mut D, state: &UiState) -> Result<()> {
    let cursor = state.menu_cursor;
    let hv = if state.settings.hv_enable {
        "HV-EN ON "
    } else {
        "HV-EN OFF"
    };
    let speed = if state.settings.filter_speed {
        "F-SPEED-FAS"
    } else {
        "F-SPEED-SLO"
    };

    write_item(display, "SYSINFO", 0, 0, cursor == 1)?;
    write_item(display, hv, 2, 0, cursor == 2)?;
    write_item(display, "FILTER", 4, 0, cursor == 3)?;
    write_item(display, speed, 6, 0, cursor == 4)
}

/// Filter sub-menu: one row per filter switch with its current value.
pub fn draw_filter<D: Display + ?Sized>(display: &mut D, state: &UiState) -> Result<()> {
    for (index, &(setting, label)) in FILTER_ITEMS.iter().enumerate() {
        let row = index as u8 * 2;
        let selected = state.filter_cursor == index as u8 + 1;
        let value = if state.settings.get(setting) { "EN " } else { "DIS" };
        write_item(display, label, row, 5, selected)?;
        write_item(display, "| ", row, 64, selected)?;
        write_item(display, value, row, 80, selected)?;
    }
    Ok(())
}

/// Detail screen for one setting. The current value is inverted.
pub fn draw_toggle<D: Display + ?Sized>(
    display: &mut D,
    setting: Setting,
    value: bool,
    ok_confirmed: bool,
) -> Result<()> {
    let layout = setting.layout();
    display.write_text(layout.title, 0, layout.title_col)?;
    write_item(display, layout.on_label, 3, layout.on_col, value)?;
    write_item(display, layout.off_label, 3, layout.off_col, !value)?;
    write_item(display, "OK", 6, 50, ok_confirmed)
}

/// System information screen.
pub fn draw_boot<D: Display + ?Sized>(display: &mut D, card: &str, info: &SysInfo) -> Result<()> {
    display.write_text(card, 0, 0)?;
    display.write_text(&info.lan_address, 2, 0)?;
    display.write_text(&info.host_name, 4, 0)?;
    display.write_text(&info.wlan_address, 6, 0)
}

/// Start-up screen.
pub fn draw_splash<D: Display + ?Sized>(display: &mut D, card: &str, info: &SysInfo) -> Result<()> {
    let mut host: String<26> = String::new();
    write!(host, "HOST:{}", info.host_name)?;
    display.write_text(&info.lan_address, 0, 0)?;
    display.write_text(&host, 2, 0)?;
    display.write_text(card, 4, 0)?;
    display.write_text(&info.wlan_address, 6, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::{level_to_db, SampleFormat};
    use heapless::Vec;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(String<24>, u8, u8, bool), 32>,
    }

    impl Recorder {
        fn find(&self, text: &str) -> Option<(u8, u8, bool)> {
            self.writes
                .iter()
                .find(|(t, ..)| t.as_str() == text)
                .map(|&(_, row, col, inv)| (row, col, inv))
        }
    }

    impl Display for Recorder {
        fn clear(&mut self) -> Result<()> {
            self.writes.clear();
            Ok(())
        }

        fn set_power(&mut self, _on: bool) -> Result<()> {
            Ok(())
        }

        fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<()> {
            let mut t = String::new();
            t.push_str(text).map_err(|_| crate::Error::BufferOverflow)?;
            self.writes
                .push((t, row, col, false))
                .map_err(|_| crate::Error::BufferOverflow)
        }

        fn write_inverted(&mut self, text: &str, row: u8, col: u8) -> Result<()> {
            self.write_text(text, row, col)?;
            if let Some(last) = self.writes.last_mut() {
                last.3 = true;
            }
            Ok(())
        }
    }

    #[test]
    fn test_info_shows_volume_mute_and_format() {
        let mut display = Recorder::default();
        let view = InfoView {
            volume: Some(VolumeLevel {
                hardware: 235,
                left_db: level_to_db(235),
                right_db: level_to_db(235),
            }),
            muted: true,
            stream: Some(StreamFormat {
                format: SampleFormat::S24,
                sample_rate: 96_000,
            }),
            rate_changed: true,
        };
        draw_info(&mut display, &view).unwrap();

        assert_eq!(display.find("-10.00dB "), Some((1, 20, false)));
        assert_eq!(display.find("@"), Some((3, 50, false)));
        assert_eq!(display.find("S"), Some((5, 5, false)));
        assert_eq!(display.find("24"), Some((5, 15, false)));
        assert_eq!(display.find("96000"), Some((5, 50, false)));
    }

    #[test]
    fn test_info_closed_stream_blanks_format() {
        let mut display = Recorder::default();
        let view = InfoView {
            volume: None,
            muted: false,
            stream: Some(StreamFormat::CLOSED),
            rate_changed: false,
        };
        draw_info(&mut display, &view).unwrap();

        assert!(display.find("S").is_none());
        assert_eq!(display.find(" "), Some((5, 5, false)));
        assert!(display.writes.iter().all(|(t, ..)| !t.contains("dB")));
    }

    #[test]
    fn test_menu_highlights_cursor() {
        let mut display = Recorder::default();
        let mut state = UiState::new();
        state.menu_cursor = 3;
        draw_menu(&mut display, &state).unwrap();

        assert_eq!(display.find("SYSINFO"), Some((0, 0, false)));
        assert_eq!(display.find("FILTER"), Some((4, 0, true)));
        assert_eq!(display.find("F-SPEED-SLO"), Some((6, 0, false)));
    }

    #[test]
    fn test_filter_rows_label_each_switch() {
        let mut display = Recorder::default();
        let mut state = UiState::new();
        state.filter_cursor = 2;
        state.settings.de_emphasis = true;
        draw_filter(&mut display, &state).unwrap();

        assert_eq!(display.find("PHCOMP "), Some((0, 5, false)));
        assert_eq!(display.find("HP-FIL "), Some((2, 5, true)));
        assert_eq!(display.find("DE-EMP "), Some((4, 5, false)));
        assert_eq!(display.find("NON-OS "), Some((6, 5, false)));
        assert_eq!(display.writes.iter().filter(|(t, ..)| t.as_str() == "EN ").count(), 1);
        assert_eq!(display.writes.len(), 12);
    }

    #[test]
    fn test_toggle_inverts_current_value() {
        let mut display = Recorder::default();
        draw_toggle(&mut display, Setting::HvEnable, false, true).unwrap();

        assert_eq!(display.find("HV ENABLE"), Some((0, 20, false)));
        assert_eq!(display.find("ON"), Some((3, 20, false)));
        assert_eq!(display.find("OFF"), Some((3, 70, true)));
        assert_eq!(display.find("OK"), Some((6, 50, true)));
    }
}

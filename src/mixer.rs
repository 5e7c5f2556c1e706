//! Mixer capability - volume, mute and DAC filter switches.
//!
//! The panel never talks to the codec directly; it goes through the
//! [`Mixer`] trait. [`SoftMixer`] keeps the state in RAM with the codec's
//! level-to-dB mapping and stands in until a codec driver is attached.

use crate::{Error, Result};

/// Highest hardware volume level.
pub const VOLUME_MAX: u8 = 255;

/// Attenuation at hardware level 0 (dB).
const VOLUME_FLOOR_DB: f32 = -127.5;

/// dB per hardware level step.
const VOLUME_STEP_DB: f32 = 0.5;

/// On/off mixer controls.
///
/// For the output controls "on" means unmuted; for the DAC options it
/// means enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MixerControl {
    Master,
    Digital,
    HvEnable,
    HighPass,
    DeEmphasis,
    NonOversample,
    PhaseCompensation,
}

impl MixerControl {
    pub const ALL: [MixerControl; 7] = [
        MixerControl::Master,
        MixerControl::Digital,
        MixerControl::HvEnable,
        MixerControl::HighPass,
        MixerControl::DeEmphasis,
        MixerControl::NonOversample,
        MixerControl::PhaseCompensation,
    ];

    const fn slot(self) -> usize {
        match self {
            MixerControl::Master => 0,
            MixerControl::Digital => 1,
            MixerControl::HvEnable => 2,
            MixerControl::HighPass => 3,
            MixerControl::DeEmphasis => 4,
            MixerControl::NonOversample => 5,
            MixerControl::PhaseCompensation => 6,
        }
    }
}

/// Current volume as reported by the codec.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeLevel {
    /// Hardware level 0..=255.
    pub hardware: u8,
    pub left_db: f32,
    pub right_db: f32,
}

/// PCM sample format of the open stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFormat {
    S16,
    S24,
    S32,
    /// No stream open.
    Closed,
}

impl SampleFormat {
    /// Bit depth label, or `None` when no stream is open.
    pub fn depth_label(self) -> Option<&'static str> {
        match self {
            SampleFormat::S16 => Some("16"),
            SampleFormat::S24 => Some("24"),
            SampleFormat::S32 => Some("32"),
            SampleFormat::Closed => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamFormat {
    pub format: SampleFormat,
    /// Sample rate (Hz); 0 when closed.
    pub sample_rate: u32,
}

impl StreamFormat {
    pub const CLOSED: StreamFormat = StreamFormat {
        format: SampleFormat::Closed,
        sample_rate: 0,
    };

    pub fn is_open(&self) -> bool {
        self.format != SampleFormat::Closed
    }
}

/// Codec control surface used by the menu.
pub trait Mixer {
    fn volume(&mut self) -> Result<VolumeLevel>;
    /// Applies to both the master and the digital stage.
    fn set_volume(&mut self, level: u8) -> Result<()>;
    fn switch(&mut self, control: MixerControl) -> Result<bool>;
    fn set_switch(&mut self, control: MixerControl, on: bool) -> Result<()>;
    /// `true` = fast roll-off.
    fn filter_speed(&mut self) -> Result<bool>;
    fn set_filter_speed(&mut self, fast: bool) -> Result<()>;
    fn stream_format(&mut self) -> Result<StreamFormat>;
}

/// Next volume level for one step up.
///
/// Steps shrink as the level approaches full scale.
pub fn volume_up(level: u8) -> u8 {
    let step = match level {
        240..=254 => 1,
        210..=239 => 3,
        120..=209 => 10,
        0..=119 => 30,
        VOLUME_MAX => 0,
    };
    level.saturating_add(step)
}

/// Next volume level for one step down, mirroring [`volume_up`].
pub fn volume_down(level: u8) -> u8 {
    let step = match level {
        241..=255 => 1,
        211..=240 => 3,
        121..=210 => 10,
        1..=120 => 30,
        0 => 0,
    };
    level.saturating_sub(step)
}

/// Codec attenuation for a hardware level.
pub fn level_to_db(level: u8) -> f32 {
    VOLUME_FLOOR_DB + f32::from(level) * VOLUME_STEP_DB
}

/// RAM-backed mixer.
#[derive(Clone, Debug)]
pub struct SoftMixer {
    level: u8,
    switches: [bool; 7],
    filter_fast: bool,
    stream: StreamFormat,
}

impl SoftMixer {
    /// Full volume, outputs unmuted, DAC options off, slow filter.
    pub const fn new() -> Self {
        Self {
            level: VOLUME_MAX,
            switches: [true, true, false, false, false, false, false],
            filter_fast: false,
            stream: StreamFormat::CLOSED,
        }
    }

    /// Report a stream opened or closed by the audio path.
    pub fn set_stream_format(&mut self, stream: StreamFormat) {
        self.stream = stream;
    }
}

impl Default for SoftMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer for SoftMixer {
    fn volume(&mut self) -> Result<VolumeLevel> {
        let db = level_to_db(self.level);
        Ok(VolumeLevel {
            hardware: self.level,
            left_db: db,
            right_db: db,
        })
    }

    fn set_volume(&mut self, level: u8) -> Result<()> {
        self.level = level;
        Ok(())
    }

    fn switch(&mut self, control: MixerControl) -> Result<bool> {
        self.switches
            .get(control.slot())
            .copied()
            .ok_or(Error::Mixer(control))
    }

    fn set_switch(&mut self, control: MixerControl, on: bool) -> Result<()> {
        let slot = self
            .switches
            .get_mut(control.slot())
            .ok_or(Error::Mixer(control))?;
        *slot = on;
        Ok(())
    }

    fn filter_speed(&mut self) -> Result<bool> {
        Ok(self.filter_fast)
    }

    fn set_filter_speed(&mut self, fast: bool) -> Result<()> {
        self.filter_fast = fast;
        Ok(())
    }

    fn stream_format(&mut self) -> Result<StreamFormat> {
        Ok(self.stream)
    }
}

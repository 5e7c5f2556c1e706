//! SSD1306 OLED display wrapper.
//!
//! Text is placed on 8-pixel pages like the panel's native addressing:
//! `row` selects the page, `col` the pixel column. Glyphs are drawn with
//! an opaque background so new text replaces whatever was in its cells.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::{Error, Result};

/// Height of one text row (pixels).
const ROW_HEIGHT: i32 = 8;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Oled<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub struct OledDisplay<I2C> {
    oled: Oled<I2C>,
}

fn text_style(inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
    let (fg, bg) = if inverted {
        (BinaryColor::Off, BinaryColor::On)
    } else {
        (BinaryColor::On, BinaryColor::Off)
    };
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(fg)
        .background_color(bg)
        .build()
}

impl<I2C> OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 display and clear the screen.
    pub fn new(i2c: I2C) -> Result<Self> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        oled.init().map_err(|_| Error::Display)?;
        oled.clear_buffer();
        oled.flush().map_err(|_| Error::Display)?;
        Ok(Self { oled })
    }

    fn draw(&mut self, text: &str, row: u8, col: u8, inverted: bool) -> Result<()> {
        let origin = Point::new(i32::from(col), i32::from(row) * ROW_HEIGHT);
        // Text past the right edge is clipped by the frame buffer.
        Text::with_baseline(text, origin, text_style(inverted), Baseline::Top)
            .draw(&mut self.oled)
            .map_err(|_| Error::Display)?;
        self.oled.flush().map_err(|_| Error::Display)
    }
}

impl<I2C> super::Display for OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) -> Result<()> {
        self.oled.clear_buffer();
        self.oled.flush().map_err(|_| Error::Display)
    }

    fn set_power(&mut self, on: bool) -> Result<()> {
        self.oled.set_display_on(on).map_err(|_| Error::Display)
    }

    fn write_text(&mut self, text: &str, row: u8, col: u8) -> Result<()> {
        self.draw(text, row, col, false)
    }

    fn write_inverted(&mut self, text: &str, row: u8, col: u8) -> Result<()> {
        self.draw(text, row, col, true)
    }
}

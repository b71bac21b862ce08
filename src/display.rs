//! Status screen model and 20×4 character layout.
//!
//! The control loop never pushes to a screen. Whatever drives the LCD pulls a
//! [`DisplayStatus`] from the service and renders it with
//! [`DisplayStatus::render`], which is pure and knows nothing about the
//! panel driver.
//!
//! ```text
//!  col 0    5        14   17
//!   " PH: 6.21     7:05PM"
//!   "TDS: 412 PPM"
//!   "TMP: 24.50°C     (H)"
//!   "PMP: ON         0:27"
//! ```

use core::fmt::Write;

use crate::clock::ClockText;
use crate::config::TemperatureUnit;
use crate::control::pump::Countdown;

pub const LCD_COLS: usize = 20;
pub const LCD_ROWS: usize = 4;

/// One rendered row. Sized in bytes, so the multi-byte degree sign fits.
pub type LcdLine = heapless::String<32>;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStatus {
    /// Temperature in `temperature_unit`; `None` when the probe is unavailable.
    pub temperature: Option<f32>,
    pub temperature_unit: TemperatureUnit,
    pub ph: f32,
    pub ph_fault: bool,
    pub ppm: f32,
    pub ppm_fault: bool,
    pub pump_on: bool,
    pub pump_countdown: Countdown,
    pub heater_on: bool,
    pub clock: ClockText,
}

impl DisplayStatus {
    pub fn temperature_fault(&self) -> bool {
        self.temperature.is_none()
    }

    pub fn render(&self) -> [LcdLine; LCD_ROWS] {
        let mut rows: [LcdLine; LCD_ROWS] = Default::default();

        place(&mut rows[0], 1, "PH:");
        if self.ph_fault {
            place(&mut rows[0], 5, "(err)");
        } else {
            place_fmt(&mut rows[0], 5, format_args!("{:.2}", self.ph));
        }
        place(&mut rows[0], 14, &self.clock);

        place(&mut rows[1], 0, "TDS:");
        if self.ppm_fault {
            place(&mut rows[1], 5, "(error)");
        } else {
            place_fmt(&mut rows[1], 5, format_args!("{:.0} PPM", self.ppm));
        }

        place(&mut rows[2], 0, "TMP:");
        match self.temperature {
            Some(t) => place_fmt(
                &mut rows[2],
                5,
                format_args!("{:.2}\u{00b0}{}", t, self.temperature_unit.suffix()),
            ),
            None => place(&mut rows[2], 5, "(err)"),
        }
        if self.heater_on {
            place(&mut rows[2], 17, "(H)");
        }

        place(&mut rows[3], 0, "PMP:");
        place(&mut rows[3], 5, if self.pump_on { "ON " } else { "OFF" });
        place_fmt(
            &mut rows[3],
            16,
            format_args!("{}:{:02}", self.pump_countdown.minutes, self.pump_countdown.seconds),
        );

        rows
    }
}

/// Boot banner shown while the self-test runs.
pub fn splash() -> [LcdLine; LCD_ROWS] {
    let mut rows: [LcdLine; LCD_ROWS] = Default::default();
    place(&mut rows[0], 1, "CONCIERGE GROWERS");
    place(&mut rows[1], 5, "Eat Good");
    place(&mut rows[2], 4, "Feel Good");
    place(&mut rows[3], 4, "Look Good");
    rows
}

/// Pad `line` with spaces up to `col`, then append `text`, clipped to the
/// panel width.
fn place(line: &mut LcdLine, col: usize, text: &str) {
    let mut used = line.chars().count();
    while used < col {
        if line.push(' ').is_err() {
            return;
        }
        used += 1;
    }
    for c in text.chars() {
        if used >= LCD_COLS || line.push(c).is_err() {
            return;
        }
        used += 1;
    }
}

fn place_fmt(line: &mut LcdLine, col: usize, args: core::fmt::Arguments<'_>) {
    let mut buf = LcdLine::new();
    if buf.write_fmt(args).is_ok() {
        place(line, col, &buf);
    }
}

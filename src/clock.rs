//! Wall-clock formatting for the status screen.
//!
//! Hours are printed without padding, minutes and seconds always with two
//! digits. In 12-hour mode the AM/PM suffix comes last, after the seconds
//! when they are shown: `"7:05PM"`, `"7:05:09PM"`, `"19:05"`.
//!
//! Older controller firmware printed the seconds after the suffix
//! (`"7:05PM:09"`). This module deliberately keeps the suffix last so the
//! time reads naturally in the top-right corner of the LCD.

use core::fmt::Write;

use chrono::Timelike;

use crate::state::CLOCK_TEXT_CAP;

pub type ClockText = heapless::String<CLOCK_TEXT_CAP>;

/// Shown when no wall clock is available.
pub const NO_CLOCK: &str = "--:--";

pub fn format_clock<T: Timelike>(time: &T, twelve_hour: bool, show_seconds: bool) -> ClockText {
    let mut out = ClockText::new();
    let (suffix, hour) = if twelve_hour {
        let (pm, h) = time.hour12();
        (Some(if pm { "PM" } else { "AM" }), h)
    } else {
        (None, time.hour())
    };

    // Capacity covers the longest form ("12:59:59PM").
    let _ = write!(out, "{}:{:02}", hour, time.minute());
    if show_seconds {
        let _ = write!(out, ":{:02}", time.second());
    }
    if let Some(suffix) = suffix {
        let _ = out.push_str(suffix);
    }
    out
}

pub fn placeholder() -> ClockText {
    let mut out = ClockText::new();
    let _ = out.push_str(NO_CLOCK);
    out
}

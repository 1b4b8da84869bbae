//! The weekly calendar grid: dates, slots, and time labels

pub mod week_view;

use chrono::{Datelike, Duration, NaiveDate};

/// The hour rows the grid displays, first and last included.
/// These mirror the scheduling-day bounds in [`crate::schedule`]
pub const FIRST_SLOT_HOUR: u32 = 6;
pub const LAST_SLOT_HOUR: u32 = 22;

/// How many entries a condensed day shows before folding the rest into a count
pub const CONDENSED_VISIBLE_LIMIT: usize = 3;

/// How the week is rendered: a full hour grid, or one compact list per day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Expanded,
    Condensed,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Expanded
    }
}

/// One hour row of the grid
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSlot {
    pub hour: u32,
    pub label: String,
}

/// The slot rows of one day, 6 AM through 10 PM
pub fn time_slots() -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| TimeSlot { hour, label: slot_label(hour) })
        .collect()
}

/// The header label of a whole-hour slot: "6 AM", "12 PM", "1 PM"
pub fn slot_label(hour: u32) -> String {
    if hour == 12 {
        "12 PM".to_string()
    } else if hour > 12 {
        format!("{} PM", hour - 12)
    } else {
        format!("{} AM", hour)
    }
}

/// A fractional hour as a clock time: `hour_label(13.5)` is "1:30 PM"
pub fn hour_label(hour: f64) -> String {
    let mut h = hour.floor() as i64;
    let mut minutes = ((hour - hour.floor()) * 60.0).round() as i64;
    if minutes == 60 {
        h += 1;
        minutes = 0;
    }
    let period = if h >= 12 { "PM" } else { "AM" };
    let display_h = if h > 12 {
        h - 12
    } else if h == 0 {
        12
    } else {
        h
    };
    format!("{}:{:02} {}", display_h, minutes, period)
}

/// The seven dates of the week containing `selected`, starting on Sunday
pub fn week_dates(selected: NaiveDate) -> [NaiveDate; 7] {
    let start = selected - Duration::days(i64::from(selected.weekday().num_days_from_sunday()));
    let mut days = [start; 7];
    for (offset, day) in days.iter_mut().enumerate() {
        *day = start + Duration::days(offset as i64);
    }
    days
}

/// The day header of the grid: "Mon, Oct 4"
pub fn format_day_header(day: NaiveDate) -> String {
    day.format("%a, %b %-d").to_string()
}

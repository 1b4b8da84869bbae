//! The view-model a UI renders the weekly grid from

use chrono::NaiveDate;

use crate::schedule::ScheduledTask;
use super::{format_day_header, time_slots, week_dates, CONDENSED_VISIBLE_LIMIT,
            FIRST_SLOT_HOUR, LAST_SLOT_HOUR};

/// One hour cell of one day, holding the entries that start within it
#[derive(Clone, Debug)]
pub struct SlotCell {
    hour: u32,
    label: String,
    entries: Vec<ScheduledTask>,
}

impl SlotCell {
    pub fn hour(&self) -> u32    { self.hour   }
    pub fn label(&self) -> &str  { &self.label }
    pub fn entries(&self) -> &[ScheduledTask] { &self.entries }
}

/// One day column of the grid
#[derive(Clone, Debug)]
pub struct DayColumn {
    date: NaiveDate,
    header: String,
    is_today: bool,
    slots: Vec<SlotCell>,
    entries: Vec<ScheduledTask>,
}

impl DayColumn {
    pub fn date(&self) -> NaiveDate { self.date     }
    pub fn header(&self) -> &str    { &self.header  }
    pub fn is_today(&self) -> bool  { self.is_today }
    pub fn slots(&self) -> &[SlotCell]        { &self.slots   }
    pub fn entries(&self) -> &[ScheduledTask] { &self.entries }

    /// What the condensed mode shows: at most [`CONDENSED_VISIBLE_LIMIT`] entries,
    /// and how many more are hidden behind the "+N more" line
    pub fn condensed_preview(&self) -> (&[ScheduledTask], usize) {
        if self.entries.len() <= CONDENSED_VISIBLE_LIMIT {
            (&self.entries, 0)
        } else {
            (&self.entries[..CONDENSED_VISIBLE_LIMIT], self.entries.len() - CONDENSED_VISIBLE_LIMIT)
        }
    }
}

/// A fully-bucketed week, ready to render.
///
/// Building one is pure: it reads a snapshot of the entries and copies what it
/// needs, so the view stays coherent even if the entry list changes afterwards.
#[derive(Clone, Debug)]
pub struct WeekView {
    days: Vec<DayColumn>,
}

impl WeekView {
    pub fn build(selected: NaiveDate, today: NaiveDate, entries: &[ScheduledTask]) -> Self {
        let days = week_dates(selected).iter()
            .map(|&date| Self::build_day(date, today, entries))
            .collect();
        Self { days }
    }

    fn build_day(date: NaiveDate, today: NaiveDate, entries: &[ScheduledTask]) -> DayColumn {
        let mut day_entries: Vec<ScheduledTask> = entries.iter()
            .filter(|entry| entry.day() == Some(date))
            .cloned()
            .collect();
        day_entries.sort_by(|a, b| a.start_hour().partial_cmp(&b.start_hour())
            .unwrap_or(std::cmp::Ordering::Equal));

        let slots = time_slots().into_iter()
            .map(|slot| {
                let slot_entries = day_entries.iter()
                    .filter(|entry| entry.start_hour().floor() as u32 == slot.hour)
                    .cloned()
                    .collect();
                SlotCell { hour: slot.hour, label: slot.label, entries: slot_entries }
            })
            .collect();

        DayColumn {
            date,
            header: format_day_header(date),
            is_today: date == today,
            slots,
            entries: day_entries,
        }
    }

    pub fn days(&self) -> &[DayColumn] {
        &self.days
    }

    /// The column for `date`, if it falls inside this week
    pub fn day(&self, date: NaiveDate) -> Option<&DayColumn> {
        self.days.iter().find(|column| column.date() == date)
    }

    /// Every entry of the week that starts before the first or after the last slot row.
    /// These exist when a server record carries an out-of-bounds start; the grid
    /// cannot place them and a UI may want to list them separately
    pub fn unslotted(&self) -> Vec<&ScheduledTask> {
        self.days.iter()
            .flat_map(|column| column.entries().iter())
            .filter(|entry| {
                let slot = entry.start_hour().floor();
                slot < f64::from(FIRST_SLOT_HOUR) || slot > f64::from(LAST_SLOT_HOUR)
            })
            .collect()
    }
}

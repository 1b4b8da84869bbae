//! Scheduled entries and the slot-search engine that places them

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use chrono::NaiveDate;

use crate::task::{Swatch, Task, TaskId};

/// The scheduling day runs from 6:00 to 22:00; no entry may spill past either end
pub const DAY_START_HOUR: f64 = 6.0;
pub const DAY_END_HOUR: f64 = 22.0;

/// Placement never works with a zero-length block
const MIN_PLACEMENT_MINUTES: u32 = 1;

/// The identifier of a calendar entry.
///
/// Same story as [`TaskId`]: server-assigned integers and client-side UUIDs both
/// travel as opaque strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryId {
    content: String,
}
impl EntryId {
    /// Generate a random EntryId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}
impl From<String> for EntryId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for EntryId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<EntryId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::String(s) => Ok(EntryId { content: s }),
            serde_json::Value::Number(n) => Ok(EntryId { content: n.to_string() }),
            _ => Err(serde::de::Error::custom("An entry id must be a string or a number")),
        }
    }
}

/// A block of time within one scheduling day, as fractional hours.
///
/// Spans are half-open: `[start, end)`. Two spans that merely touch
/// (one ends exactly where the other starts) do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourSpan {
    start: f64,
    end: f64,
}

impl HourSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The span starting at `start` and lasting `duration_minutes`
    pub fn from_start(start: f64, duration_minutes: u32) -> Self {
        Self { start, end: start + f64::from(duration_minutes) / 60.0 }
    }

    pub fn start(&self) -> f64 { self.start }
    pub fn end(&self) -> f64   { self.end   }

    pub fn duration_hours(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open interval intersection test
    pub fn overlaps(&self, other: &HourSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A task block dropped onto the calendar.
///
/// An entry remembers which template it came from (`task_id`) but carries its own
/// copy of the fields the grid displays, so deleting the template does not
/// blank out history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// The entry id (distinct from the id of the task it schedules)
    id: EntryId,
    /// The task template this entry was created from
    task_id: TaskId,

    /// Copied from the task at placement time
    title: String,
    /// Copied from the task at placement time
    color: Swatch,
    /// Copied from the task at placement time
    duration_minutes: u32,

    /// The calendar day this entry sits on.
    /// None when the server record had no parseable day; such entries are kept but never displayed
    day: Option<NaiveDate>,
    /// Where in the day the entry sits
    span: HourSpan,
}

impl ScheduledTask {
    /// Create a new entry for `task`, not on the server yet
    pub fn place(task: &Task, day: NaiveDate, span: HourSpan) -> Self {
        Self::new_with_parameters(EntryId::random(), task.id().clone(), task.title().to_string(),
                                  task.color(), task.duration_minutes(), Some(day), span)
    }

    pub fn new_with_parameters(id: EntryId, task_id: TaskId, title: String, color: Swatch,
                               duration_minutes: u32, day: Option<NaiveDate>, span: HourSpan,
                            ) -> Self
    {
        Self {
            id,
            task_id,
            title,
            color,
            duration_minutes,
            day,
            span,
        }
    }

    pub fn id(&self) -> &EntryId        { &self.id      }
    pub fn task_id(&self) -> &TaskId    { &self.task_id }
    pub fn title(&self) -> &str         { &self.title   }
    pub fn color(&self) -> Swatch       { self.color    }
    pub fn duration_minutes(&self) -> u32      { self.duration_minutes }
    pub fn day(&self) -> Option<NaiveDate>     { self.day  }
    pub fn span(&self) -> &HourSpan     { &self.span    }

    pub fn start_hour(&self) -> f64 { self.span.start() }
    pub fn end_hour(&self) -> f64   { self.span.end()   }

    /// Replace the id of this entry (e.g. once the server has assigned a real one)
    pub fn set_id(&mut self, new_id: EntryId) {
        self.id = new_id;
    }
}


/// Search the first block of `duration_minutes` on `day` that starts at or after
/// `start_hour` and collides with none of `entries`.
///
/// The search is deliberately coarse: on a collision it jumps a full block length
/// forward instead of sliding to the end of the blocking entry, which matches how
/// the product has always behaved. Requests starting before the day window are
/// bumped to its start; a block that cannot end by [`DAY_END_HOUR`] yields `None`.
pub fn find_free_slot(entries: &[ScheduledTask], day: NaiveDate, start_hour: f64, duration_minutes: u32) -> Option<HourSpan> {
    let minutes = std::cmp::max(duration_minutes, MIN_PLACEMENT_MINUTES);
    let step_hours = f64::from(minutes) / 60.0;

    let mut start = if start_hour < DAY_START_HOUR { DAY_START_HOUR } else { start_hour };
    loop {
        let candidate = HourSpan::new(start, start + step_hours);
        if candidate.end() > DAY_END_HOUR {
            return None;
        }

        let conflict = entries.iter()
            .filter(|entry| entry.day() == Some(day))
            .any(|entry| entry.span().overlaps(&candidate));
        if conflict == false {
            return Some(candidate);
        }

        start += step_hours;
    }
}


/// The immutable snapshot a drag carries from pick-up to drop.
///
/// Resolving a drop works on this snapshot and on the entry list as it is at drop
/// time; nothing that happens to the library mid-drag can change the outcome.
#[derive(Clone, Debug)]
pub struct DragPayload {
    task_id: TaskId,
    title: String,
    color: Swatch,
    duration_minutes: u32,
}

impl DragPayload {
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id().clone(),
            title: task.title().to_string(),
            color: task.color(),
            duration_minutes: task.duration_minutes(),
        }
    }

    pub fn task_id(&self) -> &TaskId { &self.task_id }
    pub fn title(&self) -> &str      { &self.title   }
    pub fn color(&self) -> Swatch    { self.color    }
    pub fn duration_minutes(&self) -> u32 { self.duration_minutes }

    /// Where this payload would land if dropped on `day` at `slot_hour`.
    /// `None` is a plain "no room today", not an error.
    pub fn resolve_drop(&self, entries: &[ScheduledTask], day: NaiveDate, slot_hour: f64) -> Option<HourSpan> {
        find_free_slot(entries, day, slot_hour, self.duration_minutes)
    }

    /// Materialize the entry this drag becomes once a slot has been resolved
    pub fn place(&self, day: NaiveDate, span: HourSpan) -> ScheduledTask {
        ScheduledTask::new_with_parameters(EntryId::random(), self.task_id.clone(),
                                           self.title.clone(), self.color,
                                           self.duration_minutes, Some(day), span)
    }
}

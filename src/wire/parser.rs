//! A module to parse server records

use serde_json::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::schedule::{EntryId, HourSpan, ScheduledTask, DAY_START_HOUR};
use crate::task::{Priority, Swatch, Task, TaskId, DEFAULT_CATEGORY};

/// What a record with a blank or missing title is called
const UNTITLED: &str = "Untitled";

/// Entries whose record carries no duration are assumed to be one hour long
const DEFAULT_ENTRY_MINUTES: u32 = 60;


/// Parse a task record into the internal representation [`crate::Task`].
///
/// This function is total and idempotent: feeding it its own serialized output
/// yields the same task again, and no input shape makes it fail.
pub fn parse_task(record: &Value) -> Task {
    let id = match field(record, &["id"]).and_then(coerce_id) {
        Some(content) => TaskId::from(content),
        None => TaskId::from(""),
    };
    let title = non_blank_string(record, &["title"]).unwrap_or_else(|| UNTITLED.to_string());
    let description = non_blank_string(record, &["description"]);
    let duration_minutes = field(record, &["duration", "durationMinutes", "duration_minutes"])
        .map(coerce_minutes)
        .unwrap_or(0);
    let category = non_blank_string(record, &["category"]).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let color = parse_color(record, &title);
    let is_recurring = field(record, &["isRecurring", "is_recurring"])
        .map(coerce_flag)
        .unwrap_or(false);
    let completed = field(record, &["completed"])
        .map(coerce_flag)
        .unwrap_or(false);
    let priority = field(record, &["priority"])
        .and_then(|value| value.as_str())
        .and_then(Priority::parse);
    let creation_date = field(record, &["createdAt", "created_at", "creation_date"])
        .and_then(parse_instant);
    let last_modified = field(record, &["updatedAt", "updated_at", "last_modified"])
        .and_then(parse_instant);

    Task::new_with_parameters(id, title, description, duration_minutes, category, color,
                              is_recurring, completed, priority, creation_date, last_modified)
}

/// Parse a calendar-entry record into the internal representation [`crate::ScheduledTask`].
///
/// Total like [`parse_task`]. Records with an unreadable day keep `day: None`;
/// a missing end time is reconstructed from the start and the duration.
pub fn parse_entry(record: &Value) -> ScheduledTask {
    let id = match field(record, &["id"]).and_then(coerce_id) {
        Some(content) => EntryId::from(content),
        None => EntryId::from(""),
    };
    let task_id = match field(record, &["taskId", "task_id"]).and_then(coerce_id) {
        Some(content) => TaskId::from(content),
        None => TaskId::from(""),
    };
    let title = non_blank_string(record, &["title"]).unwrap_or_else(|| UNTITLED.to_string());
    let color = parse_color(record, &title);
    let duration_minutes = match field(record, &["duration", "durationMinutes", "duration_minutes"]) {
        Some(value) => coerce_minutes(value),
        None => DEFAULT_ENTRY_MINUTES,
    };
    let day = field(record, &["scheduledDay", "scheduled_day", "day"]).and_then(parse_day);
    let start = field(record, &["scheduledTime", "scheduled_time"])
        .and_then(coerce_hour)
        .unwrap_or(DAY_START_HOUR);
    let end = match field(record, &["endTime", "end_time"]).and_then(coerce_hour) {
        Some(end) => end,
        None => start + f64::from(std::cmp::max(duration_minutes, 1)) / 60.0,
    };

    ScheduledTask::new_with_parameters(id, task_id, title, color, duration_minutes,
                                       day, HourSpan::new(start, end))
}


/// The first of `names` that is present and not JSON `null`
fn field<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    for name in names {
        match record.get(name) {
            None | Some(Value::Null) => continue,
            Some(value) => return Some(value),
        }
    }
    None
}

fn non_blank_string(record: &Value, names: &[&str]) -> Option<String> {
    field(record, names)
        .and_then(|value| value.as_str())
        .map(|text| text.trim())
        .filter(|text| text.is_empty() == false)
        .map(|text| text.to_string())
}

fn parse_color(record: &Value, title: &str) -> Swatch {
    match field(record, &["color"]).and_then(|value| value.as_str()) {
        None => Swatch::default(),
        Some(class) => match Swatch::from_class(class) {
            Some(swatch) => swatch,
            None => {
                log::warn!("Unknown color class {:?} on task {:?}. Falling back to {}", class, title, Swatch::default());
                Swatch::default()
            },
        },
    }
}

/// Ids come as strings or as bare numbers, depending on the endpoint
fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A duration in minutes: numbers pass through, numeric strings are parsed,
/// everything else (and anything negative) is zero
fn coerce_minutes(value: &Value) -> u32 {
    let minutes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match minutes {
        Some(m) if m.is_finite() && m > 0.0 => m as u32,
        _ => 0,
    }
}

/// Booleans come as `true`/`false` or as 0/1 integers
fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// An hour-of-day: a number, a numeric string, or a `{"hour": ...}` slot object
fn coerce_hour(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(_) => value.get("hour").and_then(coerce_hour),
        _ => None,
    }
}

fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    // Common servers send naive datetimes (no timezone). They are treated as UTC
    for format in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn parse_day(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(day);
    }
    parse_timestamp(text).map(|stamp| stamp.naive_utc().date())
}

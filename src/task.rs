//! Task templates (the reusable blocks of the task library)

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// The category a task falls back to when the server record has none
pub const DEFAULT_CATEGORY: &str = "General";

/// Durations (in minutes) at or above these thresholds bump the derived priority
const HIGH_PRIORITY_MINUTES: u32 = 120;
const MEDIUM_PRIORITY_MINUTES: u32 = 60;

/// How urgent a task is.
///
/// Most tasks never state a priority explicitly: it is derived from the duration
/// (long blocks of time are harder to fit in a week, so they should be placed first).
/// A record can still carry an explicit priority, which then wins over the derived one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// The priority a task of this duration gets when none is set explicitly
    pub fn from_duration(duration_minutes: u32) -> Self {
        if duration_minutes >= HIGH_PRIORITY_MINUTES {
            Priority::High
        } else if duration_minutes >= MEDIUM_PRIORITY_MINUTES {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Parse a server-side priority string (case-insensitive). Unknown values are `None`
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.label())
    }
}

/// One of the eight colors a task block can be painted with.
///
/// The variants are named after the palette of the web UI; [`Swatch::css_class`]
/// returns the exact class string the server stores and the UI expects back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Swatch {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Pink,
    Indigo,
    Yellow,
}

impl Swatch {
    /// Every swatch, in the order the creation form displays them
    pub fn palette() -> &'static [Swatch] {
        &[Swatch::Blue, Swatch::Green, Swatch::Red, Swatch::Purple,
          Swatch::Orange, Swatch::Pink, Swatch::Indigo, Swatch::Yellow]
    }

    /// The class string stored on the server for this swatch
    pub fn css_class(&self) -> &'static str {
        match self {
            Swatch::Blue => "bg-blue-500",
            Swatch::Green => "bg-green-500",
            Swatch::Red => "bg-red-500",
            Swatch::Purple => "bg-purple-500",
            Swatch::Orange => "bg-orange-500",
            Swatch::Pink => "bg-pink-500",
            Swatch::Indigo => "bg-indigo-500",
            Swatch::Yellow => "bg-yellow-500",
        }
    }

    /// Parse a stored class string back into a swatch. Unknown strings are `None`
    pub fn from_class(class: &str) -> Option<Self> {
        Self::palette().iter()
            .find(|swatch| swatch.css_class() == class)
            .copied()
    }

    /// The actual color of this swatch, for UIs that render outside the web palette
    pub fn color(&self) -> csscolorparser::Color {
        let hex = match self {
            Swatch::Blue => "#3b82f6",
            Swatch::Green => "#10b981",
            Swatch::Red => "#ef4444",
            Swatch::Purple => "#8b5cf6",
            Swatch::Orange => "#f97316",
            Swatch::Pink => "#ec4899",
            Swatch::Indigo => "#6366f1",
            Swatch::Yellow => "#f59e0b",
        };
        csscolorparser::parse(hex).unwrap(/* this cannot panic, these are hardcoded valid colors */)
    }
}

impl Default for Swatch {
    fn default() -> Self {
        Swatch::Blue
    }
}

impl Display for Swatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.css_class())
    }
}

/// Used to support serde
impl Serialize for Swatch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.css_class())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for Swatch {
    fn deserialize<D>(deserializer: D) -> Result<Swatch, D::Error>
    where
        D: Deserializer<'de>,
    {
        let class = String::deserialize(deserializer)?;
        Swatch::from_class(&class)
            .ok_or_else(|| serde::de::Error::custom(format!("Unknown color class {:?}", class)))
    }
}

/// The identifier of a task template.
///
/// The server assigns integer ids; tasks created while offline get a random UUID
/// until the server accepts them. Both are carried as opaque strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    content: String,
}
impl TaskId {
    /// Generate a random TaskId, for tasks the server has not assigned one yet
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}
impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde.
/// The server sends integer ids in some payloads and strings in others, so both are accepted.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::String(s) => Ok(TaskId { content: s }),
            serde_json::Value::Number(n) => Ok(TaskId { content: n.to_string() }),
            _ => Err(serde::de::Error::custom("A task id must be a string or a number")),
        }
    }
}

/// A task template.
///
/// Templates live in the user's library and never carry a date themselves:
/// dropping one on the calendar creates a separate [`ScheduledTask`](crate::ScheduledTask)
/// that copies the display fields it needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The task id (server-assigned integer, or a random UUID for tasks created offline)
    id: TaskId,

    /// The display name of the task
    title: String,
    /// Optional free-form details
    description: Option<String>,
    /// How long one block of this task takes
    duration_minutes: u32,
    /// The library category this task is filed under
    category: String,
    /// The palette color of this task's blocks
    color: Swatch,
    /// Whether this task is meant to be scheduled again and again
    is_recurring: bool,
    /// Whether the user marked this task as done
    completed: bool,

    /// An explicitly-set priority. Most records have none and derive it from the duration
    priority: Option<Priority>,

    /// The time this task was created.
    /// This will be populated in tasks created by this crate, but can be None for tasks coming from a server
    creation_date: Option<DateTime<Utc>>,
    /// The last time this task was modified.
    /// Same caveat as `creation_date`: servers do not always send it
    last_modified: Option<DateTime<Utc>>,
}


impl Task {
    /// Create a brand new Task that is not on a server yet.
    /// This will pick a new (random) task ID.
    pub fn new(title: String, duration_minutes: u32) -> Self {
        let new_id = TaskId::random();
        let now = Utc::now();
        Self::new_with_parameters(new_id, title, None, duration_minutes,
                                  DEFAULT_CATEGORY.to_string(), Swatch::default(),
                                  false, false, None, Some(now), Some(now))
    }

    /// Create a new Task instance, that may exist on the server already
    pub fn new_with_parameters(id: TaskId, title: String, description: Option<String>,
                               duration_minutes: u32, category: String, color: Swatch,
                               is_recurring: bool, completed: bool, priority: Option<Priority>,
                               creation_date: Option<DateTime<Utc>>, last_modified: Option<DateTime<Utc>>,
                            ) -> Self
    {
        Self {
            id,
            title,
            description,
            duration_minutes,
            category,
            color,
            is_recurring,
            completed,
            priority,
            creation_date,
            last_modified,
        }
    }

    pub fn id(&self) -> &TaskId          { &self.id          }
    pub fn title(&self) -> &str          { &self.title       }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn duration_minutes(&self) -> u32     { self.duration_minutes }
    pub fn category(&self) -> &str       { &self.category    }
    pub fn color(&self) -> Swatch        { self.color        }
    pub fn is_recurring(&self) -> bool   { self.is_recurring }
    pub fn completed(&self) -> bool      { self.completed    }
    pub fn creation_date(&self) -> Option<&DateTime<Utc>> { self.creation_date.as_ref() }
    pub fn last_modified(&self) -> Option<&DateTime<Utc>> { self.last_modified.as_ref() }

    /// The explicit priority if the record has one, the duration-derived one otherwise
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or_else(|| Priority::from_duration(self.duration_minutes))
    }

    /// The explicit priority, without the duration fallback
    pub fn explicit_priority(&self) -> Option<Priority> {
        self.priority
    }

    /// The duration of one block of this task, in fractional hours
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes) / 60.0
    }

    /// Replace the id of this task (e.g. once the server has assigned a real one)
    pub fn set_id(&mut self, new_id: TaskId) {
        self.id = new_id;
    }

    fn update_last_modified(&mut self) {
        self.last_modified = Some(Utc::now());
    }


    /// Rename a task.
    /// This updates its "last modified" field
    pub fn set_title(&mut self, new_title: String) {
        self.update_last_modified();
        self.title = new_title;
    }

    pub fn set_description(&mut self, new_description: Option<String>) {
        self.update_last_modified();
        self.description = new_description;
    }

    pub fn set_duration_minutes(&mut self, new_duration_minutes: u32) {
        self.update_last_modified();
        self.duration_minutes = new_duration_minutes;
    }

    pub fn set_category(&mut self, new_category: String) {
        self.update_last_modified();
        self.category = new_category;
    }

    pub fn set_color(&mut self, new_color: Swatch) {
        self.update_last_modified();
        self.color = new_color;
    }

    pub fn set_recurring(&mut self, is_recurring: bool) {
        self.update_last_modified();
        self.is_recurring = is_recurring;
    }

    /// Set the completion state
    pub fn set_completed(&mut self, completed: bool) {
        self.update_last_modified();
        self.completed = completed;
    }

    /// Set (or clear) an explicit priority
    pub fn set_priority(&mut self, new_priority: Option<Priority>) {
        self.update_last_modified();
        self.priority = new_priority;
    }

    /// A copy of this task under a new (random) id, so that the user can tweak a
    /// variant without touching the original. The copy is never born completed.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = TaskId::random();
        copy.title = format!("{} (Copy)", self.title);
        copy.completed = false;
        let now = Utc::now();
        copy.creation_date = Some(now);
        copy.last_modified = Some(now);
        copy
    }
}

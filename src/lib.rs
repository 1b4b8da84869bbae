//! This crate is the client core of Diligence, a personal task-scheduling app.
//!
//! It provides a REST client for the Diligence API in the [`client`] module, that can be used as a stand-alone module.
//!
//! Because a user-friendly app wants to keep working while the network misbehaves, this crate also provides an in-memory server in the [`memory`] module (the same one that backs the development mode of the app) and a small on-disk store in the [`storage`] module.
//!
//! The [`Dashboard`](dashboard::Dashboard) ties everything together: it owns the task library, the scheduled entries of the current window, the session, and the notices, and it talks to any [`Backend`](traits::Backend) (real server or in-memory). \
//! Pure logic (normalization, slot search, week grid) lives in its own modules and never touches the network.

pub mod traits;

pub mod calendar;
pub use calendar::week_view::WeekView;
mod task;
pub use task::{Priority, Swatch, Task, TaskId};
mod schedule;
pub use schedule::{DragPayload, EntryId, HourSpan, ScheduledTask};
mod user;
pub use user::UserProfile;
pub mod dashboard;
pub use dashboard::Dashboard;

pub mod client;
pub mod glitches;
pub mod memory;
pub mod storage;

pub mod library;
pub mod notify;
pub mod session;
pub mod wire;

pub mod config;
pub mod utils;

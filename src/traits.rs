use std::error::Error;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::schedule::{EntryId, ScheduledTask};
use crate::session::Session;
use crate::task::{Task, TaskId};
use crate::user::UserProfile;

/// What a successful sign-in hands back
#[derive(Clone, Debug)]
pub struct SignIn {
    pub token: String,
    pub user: UserProfile,
}

/// A source of tasks and scheduled entries.
///
/// The real REST server ([`crate::client::Client`]) and the in-memory one
/// ([`crate::memory::MemoryServer`]) both implement this, so everything above
/// the seam (the [`Dashboard`](crate::dashboard::Dashboard), the tests, the
/// development mode) is written once.
///
/// Authenticated operations take the caller's [`Session`]; a backend is free to
/// reject sessions it did not issue.
#[async_trait]
pub trait Backend {
    /// Exchange credentials for a token and the matching profile
    async fn login(&self, email: &str, password: &str) -> Result<SignIn, Box<dyn Error>>;
    /// Create an account, then sign it in like [`Backend::login`]
    async fn register(&self, email: &str, name: &str, password: &str) -> Result<SignIn, Box<dyn Error>>;
    /// The profile the session's token belongs to.
    /// This is how a restored session is checked for staleness
    async fn current_user(&self, session: &Session) -> Result<UserProfile, Box<dyn Error>>;

    /// Every task template of the signed-in user
    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, Box<dyn Error>>;
    /// Store a new task. Returns the canonical record (the server may assign the id)
    async fn create_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>>;
    /// Overwrite the task with this id. Returns the canonical record
    async fn update_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>>;
    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<(), Box<dyn Error>>;

    /// The scheduled entries whose day falls within `start..=end`
    async fn list_entries(&self, session: &Session, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduledTask>, Box<dyn Error>>;
    /// Store a new calendar entry. Returns the canonical record
    async fn create_entry(&self, session: &Session, entry: &ScheduledTask) -> Result<ScheduledTask, Box<dyn Error>>;
    async fn delete_entry(&self, session: &Session, id: &EntryId) -> Result<(), Box<dyn Error>>;
}

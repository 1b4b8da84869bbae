//! An in-memory Diligence server.
//!
//! This is the server that backs the development mode of the app: it keeps every
//! account in RAM, accepts the well-known development token, and assigns its own
//! ids, so the rest of the crate can be exercised with no server process around.
//! Tests can additionally wire in a [`ServerGlitches`] to make chosen operations fail.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::glitches::ServerGlitches;
use crate::schedule::{EntryId, ScheduledTask};
use crate::session::{dev_user, Session, DEV_TOKEN};
use crate::task::{Task, TaskId};
use crate::traits::{Backend, SignIn};
use crate::user::UserProfile;

/// The password the development account answers to
pub const DEV_PASSWORD: &str = "password";

struct Account {
    password: String,
    profile: UserProfile,
    tasks: Vec<Task>,
    entries: Vec<ScheduledTask>,
}

struct State {
    /// Keyed by email
    accounts: HashMap<String, Account>,
    /// Bearer token to email
    tokens: HashMap<String, String>,
    next_id: u32,
}

impl State {
    /// The account `session` proves, or the same error a real server answers with
    fn account_email(&self, session: &Session) -> Result<String, Box<dyn Error>> {
        let email = session.token()
            .and_then(|token| self.tokens.get(token));
        match email {
            Some(email) => Ok(email.clone()),
            None => Err("Could not validate credentials".into()),
        }
    }

    fn account_mut(&mut self, session: &Session) -> Result<&mut Account, Box<dyn Error>> {
        let email = self.account_email(session)?;
        // The entry is guaranteed, account_email only answers emails from the map
        Ok(self.accounts.get_mut(&email).unwrap())
    }

    fn assign_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }
}

/// A [`Backend`] that lives entirely in memory
pub struct MemoryServer {
    state: Mutex<State>,
    glitches: Option<Arc<Mutex<ServerGlitches>>>,
}

impl MemoryServer {
    /// A fresh server, with only the development account on it.
    /// [`Session::dev`] is accepted from the start, no login required
    pub fn new() -> Self {
        let dev = dev_user();
        let mut accounts = HashMap::new();
        accounts.insert(dev.email().to_string(), Account {
            password: DEV_PASSWORD.to_string(),
            profile: dev.clone(),
            tasks: Vec::new(),
            entries: Vec::new(),
        });
        let mut tokens = HashMap::new();
        tokens.insert(DEV_TOKEN.to_string(), dev.email().to_string());

        Self {
            state: Mutex::new(State { accounts, tokens, next_id: 1 }),
            glitches: None,
        }
    }

    /// Add (or remove) behaviour tweaks, so that chosen operations fail during a test
    pub fn set_glitches(&mut self, glitches: Option<Arc<Mutex<ServerGlitches>>>) {
        self.glitches = glitches;
    }
}

#[async_trait]
impl Backend for MemoryServer {
    async fn login(&self, email: &str, password: &str) -> Result<SignIn, Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_login()?; }

        let mut state = self.state.lock().unwrap();
        let known = match state.accounts.get(email) {
            Some(account) => account.password == password,
            None => false,
        };
        if known == false {
            return Err("Incorrect email or password".into());
        }

        let token = uuid::Uuid::new_v4().to_hyphenated().to_string();
        state.tokens.insert(token.clone(), email.to_string());
        let user = state.accounts[email].profile.clone();
        log::debug!("In-memory server: issued a token for {}", email);
        Ok(SignIn { token, user })
    }

    async fn register(&self, email: &str, name: &str, password: &str) -> Result<SignIn, Box<dyn Error>> {
        {
            let mut state = self.state.lock().unwrap();
            if state.accounts.contains_key(email) {
                return Err("Email already registered".into());
            }
            let id = state.assign_id();
            let profile = UserProfile::new(id, email.to_string(), name.to_string());
            state.accounts.insert(email.to_string(), Account {
                password: password.to_string(),
                profile,
                tasks: Vec::new(),
                entries: Vec::new(),
            });
        }
        self.login(email, password).await
    }

    async fn current_user(&self, session: &Session) -> Result<UserProfile, Box<dyn Error>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.account_mut(session)?.profile.clone())
    }

    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_list_tasks()?; }

        let mut state = self.state.lock().unwrap();
        Ok(state.account_mut(session)?.tasks.clone())
    }

    async fn create_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_create_task()?; }

        let mut state = self.state.lock().unwrap();
        state.account_email(session)?;
        let id = state.assign_id();
        let mut created = task.clone();
        created.set_id(TaskId::from(id));
        state.account_mut(session)?.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_update_task()?; }

        let mut state = self.state.lock().unwrap();
        let account = state.account_mut(session)?;
        for stored in account.tasks.iter_mut() {
            if stored.id() == task.id() {
                *stored = task.clone();
                return Ok(stored.clone());
            }
        }
        Err("Task not found".into())
    }

    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<(), Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_delete_task()?; }

        let mut state = self.state.lock().unwrap();
        let account = state.account_mut(session)?;
        let before = account.tasks.len();
        // Entries that point to this task survive, they carry their own copy of
        // the fields they display
        account.tasks.retain(|task| task.id() != id);
        if account.tasks.len() == before {
            return Err("Task not found".into());
        }
        Ok(())
    }

    async fn list_entries(&self, session: &Session, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<ScheduledTask>, Box<dyn Error>>
    {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_list_entries()?; }

        let mut state = self.state.lock().unwrap();
        let account = state.account_mut(session)?;
        let entries = account.entries.iter()
            .filter(|entry| match entry.day() {
                Some(day) => start <= day && day <= end,
                None => false,
            })
            .cloned()
            .collect();
        Ok(entries)
    }

    async fn create_entry(&self, session: &Session, entry: &ScheduledTask) -> Result<ScheduledTask, Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_create_entry()?; }

        let mut state = self.state.lock().unwrap();
        state.account_email(session)?;
        if entry.day().is_none() {
            return Err("A scheduled task needs a day".into());
        }
        let id = state.assign_id();
        let mut created = entry.clone();
        created.set_id(EntryId::from(id));
        state.account_mut(session)?.entries.push(created.clone());
        Ok(created)
    }

    async fn delete_entry(&self, session: &Session, id: &EntryId) -> Result<(), Box<dyn Error>> {
        if let Some(glitches) = &self.glitches { glitches.lock().unwrap().can_delete_entry()?; }

        let mut state = self.state.lock().unwrap();
        let account = state.account_mut(session)?;
        let before = account.entries.len();
        account.entries.retain(|entry| entry.id() != id);
        if account.entries.len() == before {
            return Err("Scheduled task not found".into());
        }
        Ok(())
    }
}

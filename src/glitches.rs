//! This module provides ways to tweak the in-memory server, so that it can return errors on some tests

use std::error::Error;

/// This stores some behaviour tweaks, that describe how an in-memory server will behave during a given test
///
/// So that an operation fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct ServerGlitches {
    /// If this is true, every operation will be allowed
    pub is_suspended: bool,

    // Auth operations
    pub login_behaviour: (u32, u32),

    // Task operations
    pub list_tasks_behaviour: (u32, u32),
    pub create_task_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),

    // Scheduled entry operations
    pub list_entries_behaviour: (u32, u32),
    pub create_entry_behaviour: (u32, u32),
    pub delete_entry_behaviour: (u32, u32),
}

impl ServerGlitches {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            login_behaviour: (0, n_fails),
            list_tasks_behaviour: (0, n_fails),
            create_task_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
            list_entries_behaviour: (0, n_fails),
            create_entry_behaviour: (0, n_fails),
            delete_entry_behaviour: (0, n_fails),
        }
    }

    /// Suspend this glitch set until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make these glitches active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_login(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.login_behaviour, "login")
    }
    pub fn can_list_tasks(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_tasks_behaviour, "list_tasks")
    }
    pub fn can_create_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_task_behaviour, "create_task")
    }
    pub fn can_update_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_task_behaviour, "update_task")
    }
    pub fn can_delete_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_task_behaviour, "delete_task")
    }
    pub fn can_list_entries(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_entries_behaviour, "list_entries")
    }
    pub fn can_create_entry(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_entry_behaviour, "create_entry")
    }
    pub fn can_delete_entry(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_entry_behaviour, "delete_entry")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Server glitch: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Server glitch: failing a {} ({:?})", descr, value);
            Err(format!("Glitched server requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Server glitch: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

//! This module provides a small on-disk store for the session and for a
//! last-seen snapshot of the library, so the app has something to show before
//! (or without) a server round-trip

use std::path::PathBuf;
use std::path::Path;
use std::error::Error;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::config::app_name;
use crate::library::TaskLibrary;
use crate::user::UserProfile;

/// Session and snapshot data, backed by a local JSON file
#[derive(Debug, PartialEq)]
pub struct LocalStore {
    backing_file: PathBuf,
    data: StoredData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct StoredData {
    token: Option<String>,
    user: Option<UserProfile>,
    library: TaskLibrary,
    saved_at: Option<DateTime<Utc>>,
}

impl LocalStore {
    /// The path of the store shared by all accounts
    pub fn default_file() -> PathBuf {
        PathBuf::from(format!("~/.config/{}/store.json", app_name().to_lowercase()))
    }

    /// The path of the store of one account.
    /// The email is sanitized, since emails contain characters some filesystems refuse
    pub fn account_file(email: &str) -> PathBuf {
        let name = sanitize_filename::sanitize(email);
        PathBuf::from(format!("~/.config/{}/{}.json", app_name().to_lowercase(), name))
    }

    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty store
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            data: StoredData::default(),
        }
    }

    /// A store loaded from `path`, or a fresh one when the file is missing or unreadable
    pub fn open(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                log::debug!("Starting with a fresh store: {}", err);
                Self::new(path)
            },
        }
    }

    /// Write the current content to the backing file.
    /// Persistence is best-effort: a failure is logged, never returned
    fn save_to_file(&mut self) {
        self.data.saved_at = Some(Utc::now());

        let path = &self.backing_file;
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::warn!("Unable to create directory {:?}: {}", parent, err);
                return;
            }
        }
        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, &self.data) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }


    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.data.user.as_ref()
    }

    /// The library as it looked the last time it was snapshotted
    pub fn library_snapshot(&self) -> &TaskLibrary {
        &self.data.library
    }

    /// When the store was last written, if ever
    pub fn saved_at(&self) -> Option<&DateTime<Utc>> {
        self.data.saved_at.as_ref()
    }

    pub fn set_credentials(&mut self, token: String, user: UserProfile) {
        self.data.token = Some(token);
        self.data.user = Some(user);
        self.save_to_file();
    }

    pub fn clear_credentials(&mut self) {
        self.data.token = None;
        self.data.user = None;
        self.save_to_file();
    }

    pub fn save_library_snapshot(&mut self, library: &TaskLibrary) {
        self.data.library = library.clone();
        self.save_to_file();
    }
}

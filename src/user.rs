//! The account a session belongs to

use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};

/// A Diligence account, as returned by `GET /auth/me`.
///
/// Only `id`, `email` and `name` are guaranteed; the rest depends on the server
/// version, so known-but-absent fields default instead of failing the parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id. Servers send integers, the development mode sends a string
    #[serde(deserialize_with = "id_from_string_or_number")]
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    email_verified: bool,
}

fn default_true() -> bool { true }

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("A user id must be a string or a number")),
    }
}

impl UserProfile {
    pub fn new(id: String, email: String, name: String) -> Self {
        Self {
            id,
            email,
            name,
            created_at: None,
            is_active: true,
            email_verified: false,
        }
    }

    pub fn id(&self) -> &str    { &self.id    }
    pub fn email(&self) -> &str { &self.email }
    pub fn name(&self) -> &str  { &self.name  }
    pub fn created_at(&self) -> Option<&DateTime<Utc>> { self.created_at.as_ref() }
    pub fn is_active(&self) -> bool      { self.is_active      }
    pub fn email_verified(&self) -> bool { self.email_verified }
}

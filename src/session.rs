//! The auth session: who is signed in, and how outgoing requests prove it

use reqwest::header::AUTHORIZATION;

use crate::storage::LocalStore;
use crate::user::UserProfile;

/// The token the development backend accepts without talking to any server
pub const DEV_TOKEN: &str = "dev-token-12345";

/// The account the development backend signs everyone in as
pub fn dev_user() -> UserProfile {
    UserProfile::new("dev-user-123".to_string(),
                     "dev@example.com".to_string(),
                     "Development User".to_string())
}

/// Attach a bearer token to an outgoing request.
/// [`Session::authorize`] is the usual entry point; this one exists for the
/// moment during sign-in when a token is known but its profile is not yet
pub fn bearer(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    request.header(AUTHORIZATION, format!("Bearer {}", token))
}

/// Whether somebody is signed in, and as whom.
///
/// A session is a plain value: cloning it is cheap and there is no global
/// current-user anywhere in this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum Session {
    Anonymous,
    Authenticated { token: String, user: UserProfile },
}

impl Session {
    pub fn authenticated(token: String, user: UserProfile) -> Self {
        Session::Authenticated { token, user }
    }

    /// The session the development mode starts with
    pub fn dev() -> Self {
        Session::Authenticated { token: DEV_TOKEN.to_string(), user: dev_user() }
    }

    /// Rebuild the session persisted in `store`, if there is a complete one
    pub fn restore(store: &LocalStore) -> Self {
        match (store.token(), store.user()) {
            (Some(token), Some(user)) => {
                log::info!("Restored session for {}", user.email());
                Session::Authenticated { token: token.to_string(), user: user.clone() }
            },
            _ => Session::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        match self {
            Session::Authenticated { .. } => true,
            _ => false,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous => None,
        }
    }

    /// Attach the bearer token to an outgoing request.
    /// Anonymous sessions leave the request untouched
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Session::Authenticated { token, .. } => bearer(request, token),
            Session::Anonymous => request,
        }
    }

    /// Write this session into `store` (or wipe the stored one when anonymous)
    pub fn persist(&self, store: &mut LocalStore) {
        match self {
            Session::Authenticated { token, user } => store.set_credentials(token.clone(), user.clone()),
            Session::Anonymous => store.clear_credentials(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::Anonymous
    }
}

//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The application name, as used in storage paths and demo output.
/// Feel free to override it when initing this library.
pub static APP_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Diligence".to_string())));

/// The server URL a [`Client`](crate::client::Client) connects to when the caller does not provide one.
/// Feel free to override it when initing this library.
pub static DEFAULT_SERVER_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8000".to_string())));

/// Current value of [`APP_NAME`]
pub fn app_name() -> String {
    APP_NAME.lock().unwrap().clone()
}

/// Current value of [`DEFAULT_SERVER_URL`]
pub fn default_server_url() -> String {
    DEFAULT_SERVER_URL.lock().unwrap().clone()
}

//! Talking to a real Diligence server over its REST API

use std::error::Error;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;
use serde_json::Value;
use url::Url;

use crate::config::default_server_url;
use crate::schedule::EntryId;
use crate::schedule::ScheduledTask;
use crate::session;
use crate::session::Session;
use crate::task::Task;
use crate::task::TaskId;
use crate::traits::Backend;
use crate::traits::SignIn;
use crate::user::UserProfile;
use crate::wire;

static APP_JSON: &str = "application/json";

/// A [`Backend`] implemented over the server's REST API.
///
/// Every call builds a fresh request; no connection state is kept between calls.
/// The session (and thus the bearer token) is owned by the caller and passed in
/// on each operation.
pub struct Client {
    url: Url,
}

impl Client {
    /// Create a client for the server at `url`. This simply stores the address,
    /// it does not attempt a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self { url })
    }

    /// A client pointed at the configured default server
    pub fn new_from_config() -> Result<Self, Box<dyn Error>> {
        Self::new(default_server_url())
    }

    pub fn url(&self) -> &Url { &self.url }

    /// Build the absolute URL for an API path such as `"tasks"` or `"auth/login"`
    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        let address = format!("{}/{}", self.url.as_str().trim_end_matches('/'), path);
        Ok(Url::parse(&address)?)
    }

    async fn sub_request(&self, method: Method, path: &str, session: &Session, body: Option<Value>)
        -> Result<String, Box<dyn Error>>
    {
        let url = self.endpoint(path)?;

        let mut request = reqwest::Client::new().request(method, url.as_str());
        request = session.authorize(request);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, APP_JSON)
                .body(serde_json::to_string(&body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() == false {
            return Err(format!("Unexpected HTTP status code {} on /{}: {}", status, path, error_detail(&text)).into());
        }
        Ok(text)
    }

    async fn sub_request_and_parse(&self, method: Method, path: &str, session: &Session, body: Option<Value>)
        -> Result<Value, Box<dyn Error>>
    {
        let text = self.sub_request(method, path, session, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the profile behind a bearer token.
    /// Used during sign-in, before a full [`Session`] exists
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, Box<dyn Error>> {
        let url = self.endpoint("auth/me")?;

        let request = reqwest::Client::new().get(url.as_str());
        let response = session::bearer(request, token).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() == false {
            return Err(format!("Unexpected HTTP status code {} on /auth/me: {}", status, error_detail(&text)).into());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Servers report errors as a JSON body with a `detail` field. Pull it out when
/// it is there, otherwise fall back to the raw body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(reply) => match reply.get("detail").and_then(|detail| detail.as_str()) {
            Some(detail) => detail.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

fn records_of(reply: Value, path: &str) -> Result<Vec<Value>, Box<dyn Error>> {
    match reply {
        Value::Array(records) => Ok(records),
        _ => Err(format!("Reply from /{} is not a list", path).into()),
    }
}

#[async_trait]
impl Backend for Client {
    async fn login(&self, email: &str, password: &str) -> Result<SignIn, Box<dyn Error>> {
        let body = json!({
            "email": email,
            "password": password,
        });
        let reply = self.sub_request_and_parse(Method::POST, "auth/login", &Session::Anonymous, Some(body)).await?;
        let token = match reply.get("access_token").and_then(|token| token.as_str()) {
            Some(token) => token.to_string(),
            None => return Err("Login reply carries no access_token".into()),
        };
        let user = self.fetch_profile(&token).await?;
        Ok(SignIn { token, user })
    }

    async fn register(&self, email: &str, name: &str, password: &str) -> Result<SignIn, Box<dyn Error>> {
        let body = json!({
            "email": email,
            "name": name,
            "password": password,
        });
        self.sub_request(Method::POST, "auth/register", &Session::Anonymous, Some(body)).await?;
        // Accounts are not signed in by the register endpoint itself
        self.login(email, password).await
    }

    async fn current_user(&self, session: &Session) -> Result<UserProfile, Box<dyn Error>> {
        let text = self.sub_request(Method::GET, "auth/me", session, None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, Box<dyn Error>> {
        let reply = self.sub_request_and_parse(Method::GET, "tasks", session, None).await?;
        let records = records_of(reply, "tasks")?;
        Ok(records.iter().map(wire::parse_task).collect())
    }

    async fn create_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>> {
        let body = wire::task_payload(task);
        let reply = self.sub_request_and_parse(Method::POST, "tasks", session, Some(body)).await?;
        Ok(wire::parse_task(&reply))
    }

    async fn update_task(&self, session: &Session, task: &Task) -> Result<Task, Box<dyn Error>> {
        let body = wire::task_payload(task);
        let path = format!("tasks/{}", task.id());
        let reply = self.sub_request_and_parse(Method::PUT, &path, session, Some(body)).await?;
        Ok(wire::parse_task(&reply))
    }

    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let path = format!("tasks/{}", id);
        self.sub_request(Method::DELETE, &path, session, None).await?;
        Ok(())
    }

    async fn list_entries(&self, session: &Session, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<ScheduledTask>, Box<dyn Error>>
    {
        let path = format!("scheduled-tasks?startDate={}&endDate={}",
            start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        let reply = self.sub_request_and_parse(Method::GET, &path, session, None).await?;
        let records = records_of(reply, "scheduled-tasks")?;
        Ok(records.iter().map(wire::parse_entry).collect())
    }

    async fn create_entry(&self, session: &Session, entry: &ScheduledTask) -> Result<ScheduledTask, Box<dyn Error>> {
        let body = wire::entry_payload(entry);
        let reply = self.sub_request_and_parse(Method::POST, "scheduled-tasks", session, Some(body)).await?;
        Ok(wire::parse_entry(&reply))
    }

    async fn delete_entry(&self, session: &Session, id: &EntryId) -> Result<(), Box<dyn Error>> {
        let path = format!("scheduled-tasks/{}", id);
        self.sub_request(Method::DELETE, &path, session, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn endpoints_tolerate_trailing_slashes() {
        let plain = Client::new("http://localhost:8000").unwrap();
        let slashed = Client::new("http://localhost:8000/").unwrap();
        assert_eq!(plain.endpoint("tasks").unwrap().as_str(), "http://localhost:8000/tasks");
        assert_eq!(slashed.endpoint("tasks").unwrap().as_str(), "http://localhost:8000/tasks");
        assert_eq!(plain.endpoint("auth/login").unwrap().as_str(), "http://localhost:8000/auth/login");
    }

    #[test]
    fn endpoints_keep_query_strings() {
        let client = Client::new("http://localhost:8000").unwrap();
        let url = client.endpoint("scheduled-tasks?startDate=2021-09-26&endDate=2021-10-17").unwrap();
        assert_eq!(url.query(), Some("startDate=2021-09-26&endDate=2021-10-17"));
    }

    #[test]
    fn error_details_prefer_the_detail_field() {
        assert_eq!(error_detail(r#"{"detail": "Incorrect email or password"}"#), "Incorrect email or password");
        assert_eq!(error_detail(r#"{"message": "nope"}"#), r#"{"message": "nope"}"#);
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
    }
}

//! Ephemeral notices that tell the user how an operation went

use std::fmt::{Display, Error, Formatter};

use chrono::{DateTime, Duration, Utc};

/// How long a notice stays on screen before it dismisses itself
const DEFAULT_LIFETIME_MS: i64 = 3000;

/// The tone of a notice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl Display for NoticeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
            NoticeLevel::Info => write!(f, "info"),
        }
    }
}

/// A message shown to the user for a few seconds
#[derive(Clone, Debug)]
pub struct Notice {
    message: String,
    level: NoticeLevel,
    born: DateTime<Utc>,
    lifetime: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: String) -> Self {
        Self {
            message,
            level,
            born: Utc::now(),
            lifetime: Duration::milliseconds(DEFAULT_LIFETIME_MS),
        }
    }

    /// A notice that stays up for a custom time (errors the user must not miss, mostly)
    pub fn new_with_lifetime(level: NoticeLevel, message: String, lifetime: Duration) -> Self {
        Self { message, level, born: Utc::now(), lifetime }
    }

    pub fn message(&self) -> &str      { &self.message }
    pub fn level(&self) -> NoticeLevel { self.level    }
    pub fn born(&self) -> &DateTime<Utc> { &self.born  }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.born >= self.lifetime
    }
}


/// See [`notice_channel`]
pub type NoticeSender = tokio::sync::watch::Sender<Option<Notice>>;
/// See [`notice_channel`]
pub type NoticeReceiver = tokio::sync::watch::Receiver<Option<Notice>>;

/// Create a feedback channel, that a UI can watch to always display the latest notice
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    tokio::sync::watch::channel(None)
}


/// Collects the notices of a session and forwards them to an optional listener.
///
/// Every notice is also written to the log at the matching level, so headless
/// runs keep a trace of what the user would have seen.
pub struct NotificationCenter {
    notices: Vec<Notice>,
    feedback_channel: Option<NoticeSender>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self { notices: Vec::new(), feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: NoticeSender) -> Self {
        Self { notices: Vec::new(), feedback_channel: Some(channel) }
    }

    /// Post a success notice
    pub fn success(&mut self, text: &str) {
        log::info!("{}", text);
        self.push(Notice::new(NoticeLevel::Success, text.to_string()));
    }
    /// Post an error notice
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.push(Notice::new(NoticeLevel::Error, text.to_string()));
    }
    /// Post an info notice
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
        self.push(Notice::new(NoticeLevel::Info, text.to_string()));
    }

    pub fn push(&mut self, notice: Notice) {
        self.feedback_channel
            .as_ref()
            .map(|sender| {
                sender.send(Some(notice.clone()))
            });
        self.notices.push(notice);
    }

    /// The most recent notice, expired or not
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// The notices still on screen at `now`
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notice> {
        self.notices.iter()
            .filter(|notice| notice.is_expired(now) == false)
            .collect()
    }

    /// Drop every notice that has expired by `now`
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        self.notices.retain(|notice| notice.is_expired(now) == false);
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_their_lifetime() {
        let notice = Notice::new(NoticeLevel::Success, "Task created".to_string());
        let born = *notice.born();

        assert_eq!(notice.is_expired(born), false);
        assert_eq!(notice.is_expired(born + Duration::milliseconds(2999)), false);
        assert!(notice.is_expired(born + Duration::milliseconds(3000)));
        assert!(notice.is_expired(born + Duration::seconds(60)));
    }

    #[test]
    fn the_center_keeps_only_live_notices_on_screen() {
        let mut center = NotificationCenter::new();
        center.success("Saved");
        center.error("Lost connection");

        let now = Utc::now();
        assert_eq!(center.active(now).len(), 2);

        let later = now + Duration::seconds(10);
        assert_eq!(center.active(later).len(), 0);
        center.sweep(later);
        assert!(center.latest().is_none());
    }

    #[test]
    fn listeners_see_the_latest_notice() {
        let (sender, receiver) = notice_channel();
        let mut center = NotificationCenter::new_with_feedback_channel(sender);

        assert!(receiver.borrow().is_none());
        center.info("No room on this day");

        let seen = receiver.borrow();
        let notice = seen.as_ref().unwrap();
        assert_eq!(notice.level(), NoticeLevel::Info);
        assert_eq!(notice.message(), "No room on this day");
    }
}

use std::time::{Duration, Instant};

pub const AUTO_HIDE_AFTER: Duration = Duration::from_secs(2);

pub const ERROR_TITLE: &str = "An error occurred!";
pub const DELETED_MESSAGE: &str = "Todo successfully deleted";
pub const UPDATED_MESSAGE: &str = "Successfully updated todo";
pub const SAVED_MESSAGE: &str = "Updated successfully";
pub const SAVING_MESSAGE: &str = "This todo is still being saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Toast shown on top of the current page
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub title: Option<String>,
    pub message: String,
    opened_at: Instant,
}

impl Notification {
    pub fn new<T: Into<String>>(severity: Severity, message: T, now: Instant) -> Self {
        Self {
            severity,
            title: None,
            message: message.into(),
            opened_at: now,
        }
    }

    pub fn success<T: Into<String>>(message: T, now: Instant) -> Self {
        Self::new(Severity::Success, message, now)
    }

    pub fn info<T: Into<String>>(message: T, now: Instant) -> Self {
        Self::new(Severity::Info, message, now)
    }

    /// Error toast with the shared failure title
    pub fn error<T: Into<String>>(message: T, now: Instant) -> Self {
        Self {
            title: Some(ERROR_TITLE.to_string()),
            ..Self::new(Severity::Error, message, now)
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.opened_at) >= AUTO_HIDE_AFTER
    }
}

/// Holds at most one open toast, a newer one replaces the older
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn show(&mut self, notification: Notification) {
        log::debug!("{:?}: {}", notification.severity, notification.message);
        self.current = Some(notification);
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.current.as_ref().map_or(false, |n| n.is_expired(now)) {
            self.current = None;
        }
    }
}

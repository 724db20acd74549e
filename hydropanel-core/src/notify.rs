use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Holds the toasts currently on screen. Every state-changing outcome lands
/// here; entries expire after a fixed display duration.
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    display_duration: Duration,
}

impl NotificationCenter {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            display_duration,
        }
    }

    pub fn show(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drop notifications older than the display duration.
    pub fn sweep_expired(&mut self) {
        let now = Instant::now();
        let display_duration = self.display_duration;
        self.notifications
            .retain(|n| now.duration_since(n.created_at) < display_duration);
    }

    pub fn active(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn display_duration(&self) -> Duration {
        self.display_duration
    }
}

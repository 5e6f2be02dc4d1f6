//! User-facing notifications
//!
//! The gateway reports every failed request (and every base-address change)
//! through a `Notifier`, the toast service of the hosting UI. Notifications
//! are fire-and-forget and never block the request future.

use std::sync::Mutex;
use std::time::Duration;

/// Toast presentation service.
pub trait Notifier: Send + Sync {
    fn success(&self, text: &str);

    fn warning(&self, text: &str, duration: Duration);

    fn error(&self, text: &str, duration: Duration);
}

/// Writes notifications to the `tracing` pipeline. Used when no UI is
/// attached (CLI tools, background jobs).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, text: &str) {
        tracing::info!(target: "console_core::notify", "{text}");
    }

    fn warning(&self, text: &str, duration: Duration) {
        tracing::warn!(target: "console_core::notify", duration_secs = duration.as_secs(), "{text}");
    }

    fn error(&self, text: &str, duration: Duration) {
        tracing::error!(target: "console_core::notify", duration_secs = duration.as_secs(), "{text}");
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn success(&self, _text: &str) {}
    fn warning(&self, _text: &str, _duration: Duration) {}
    fn error(&self, _text: &str, _duration: Duration) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub duration: Option<Duration>,
}

/// Keeps every notification in memory so callers can assert on them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.level == level)
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn push(&self, level: NotificationLevel, text: &str, duration: Option<Duration>) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                level,
                text: text.to_string(),
                duration,
            });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, text: &str) {
        self.push(NotificationLevel::Success, text, None);
    }

    fn warning(&self, text: &str, duration: Duration) {
        self.push(NotificationLevel::Warning, text, Some(duration));
    }

    fn error(&self, text: &str, duration: Duration) {
        self.push(NotificationLevel::Error, text, Some(duration));
    }
}

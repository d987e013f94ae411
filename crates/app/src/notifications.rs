//! Notifications
//!
//! Every controller operation ends in exactly one notification for the
//! cashier, whether it succeeded or not.

use std::fmt;

use mockall::automock;
use tracing::{error, info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// The operation went through.
    Success,

    /// Neutral information, e.g. a line was removed.
    Info,

    /// The request was refused but nothing is wrong, e.g. not enough stock.
    Warning,

    /// Something failed.
    Error,
}

impl NotificationLevel {
    /// Lowercase name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient, dismissible message for the cashier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,

    /// Message text, in Spanish
    pub message: String,
}

impl Notification {
    /// A notification at `level`.
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// A completed operation.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Neutral feedback.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    /// A rejected request the cashier can correct.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    /// A failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Where notifications go.
#[automock]
pub trait Notifier: Send + Sync {
    /// Show `notification` to the cashier.
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { level, message } = notification;

        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(%level, "{message}");
            }
            NotificationLevel::Warning => warn!(%level, "{message}"),
            NotificationLevel::Error => error!(%level, "{message}"),
        }
    }
}

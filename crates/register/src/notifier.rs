//! Notifications printed on the register screen.

use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use till_app::notifications::{Notification, NotificationLevel, Notifier};
use tracing::warn;

/// Writes each notification as one line, tagged by level.
#[derive(Debug)]
pub(crate) struct TerminalNotifier<W> {
    out: Mutex<W>,
}

impl TerminalNotifier<io::Stdout> {
    /// Notifier for standard output.
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalNotifier<W> {
    /// Notifier writing to `out`.
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[cfg(test)]
impl TerminalNotifier<Vec<u8>> {
    pub(crate) fn text(&self) -> String {
        let out = self.out.lock().unwrap_or_else(PoisonError::into_inner);

        String::from_utf8_lossy(&out).into_owned()
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: Notification) {
        let tag = match notification.level {
            NotificationLevel::Success => "✔",
            NotificationLevel::Info => "·",
            NotificationLevel::Warning => "!",
            NotificationLevel::Error => "✘",
        };

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(error) = writeln!(out, "{tag} {}", notification.message).and_then(|()| out.flush()) {
            warn!(%error, message = %notification.message, "could not print notification");
        }
    }
}

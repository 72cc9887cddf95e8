//! # User Notifications
//!
//! Transient messages (toasts) shown next to the main output.

use colored::Colorize;

/// Sink for transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}

/// Writes notifications to stderr, colored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    fn info(&self, message: &str) {
        eprintln!("{} {}", "•".cyan(), message);
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn error(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every notification for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub errors: Mutex<Vec<String>>,
        pub infos: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub(crate) fn errors(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }

        pub(crate) fn infos(&self) -> Vec<String> {
            self.infos.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        fn info(&self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        notifier.error("Product not found");
        notifier.info("History cleared");
        NoOpNotifier.error("ignored");

        assert_eq!(notifier.errors(), vec!["Product not found"]);
        assert_eq!(notifier.infos(), vec!["History cleared"]);
    }
}

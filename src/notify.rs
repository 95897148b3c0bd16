// 📣 Notifications - fire-and-forget messages to customers

use std::cell::RefCell;

/// Notifier - receives plain text messages, no delivery guarantee
pub trait Notifier {
    fn send(&self, message: &str, recipient: Option<&str>);
}

/// Prints notifications to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, message: &str, recipient: Option<&str>) {
        match recipient {
            Some(to) => println!("Notification for {}: {}", to, message),
            None => println!("Notification: {}", message),
        }
        tracing::debug!(recipient = recipient.unwrap_or("-"), "Notification sent");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub recipient: Option<String>,
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &str, recipient: Option<&str>) {
        self.sent.borrow_mut().push(Notification {
            message: message.to_string(),
            recipient: recipient.map(str::to_string),
        });
    }
}

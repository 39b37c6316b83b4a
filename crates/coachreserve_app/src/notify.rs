//! Transient user notifications ("toasts").
//!
//! Views report outcomes through a [`Notifier`]; the shell decides how to
//! show them. [`ToastQueue`] buffers them for the shell to drain.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// In-memory notifier. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Notification>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        // A panic while pushing cannot leave the queue half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    /// Copy of the queue without consuming it.
    pub fn peek(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "Notification"),
            NotificationLevel::Error => warn!(message = %notification.message, "Error notification"),
        }
        self.lock().push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_order_and_drains() {
        let queue = ToastQueue::new();
        queue.success("one");
        queue.error("two");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.last(), Some(Notification::error("two")));

        let drained = queue.drain();
        assert_eq!(drained[0], Notification::success("one"));
        assert!(drained[1].is_error());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let queue = ToastQueue::new();
        let handle: Arc<dyn Notifier> = Arc::new(queue.clone());
        handle.success("shared");
        assert_eq!(queue.peek(), vec![Notification::success("shared")]);
    }
}

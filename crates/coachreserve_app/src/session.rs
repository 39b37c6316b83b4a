//! Shared session state.
//!
//! `SessionContext` is created once by the application and handed to every
//! view. Views that react to sign-in or sign-out hold a
//! [`SessionSubscription`] for as long as they are mounted; dropping it is
//! the unsubscribe.

use coachreserve_common::models::Session;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// A change observed by a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    /// Same user, new tokens.
    Refreshed(Session),
}

fn diff(previous: &Option<Session>, current: &Option<Session>) -> Option<SessionEvent> {
    match (previous, current) {
        (None, None) => None,
        (Some(_), None) => Some(SessionEvent::SignedOut),
        (None, Some(session)) => Some(SessionEvent::SignedIn(session.clone())),
        (Some(old), Some(new)) if old == new => None,
        (Some(old), Some(new)) if old.user_id() == new.user_id() => {
            Some(SessionEvent::Refreshed(new.clone()))
        }
        (Some(_), Some(new)) => Some(SessionEvent::SignedIn(new.clone())),
    }
}

/// Injected holder of the current session. Clones share state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    sender: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn with_session(session: Session) -> Self {
        let context = Self::new();
        context.sender.send_replace(Some(session));
        context
    }

    /// The current session, if any.
    pub fn snapshot(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.sender.borrow().is_some()
    }

    pub fn set(&self, session: Session) {
        info!(user_id = %session.user_id(), "Session set");
        self.sender.send_replace(Some(session));
    }

    pub fn clear(&self) {
        if self.sender.send_replace(None).is_some() {
            info!("Session cleared");
        }
    }

    /// Starts observing changes made after this call.
    pub fn subscribe(&self) -> SessionSubscription {
        let mut receiver = self.sender.subscribe();
        let last = receiver.borrow_and_update().clone();
        debug!(subscribers = self.subscriber_count(), "Session subscription opened");
        SessionSubscription { receiver, last }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Live handle on session changes. Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<Session>>,
    last: Option<Session>,
}

impl SessionSubscription {
    /// Session as last observed through this handle.
    pub fn current(&self) -> Option<&Session> {
        self.last.as_ref()
    }

    /// Returns the pending change, if any, without waiting.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        if !self.receiver.has_changed().unwrap_or(false) {
            return None;
        }
        let current = self.receiver.borrow_and_update().clone();
        let event = diff(&self.last, &current);
        self.last = current;
        event
    }

    /// Waits for the next change. `None` once the context is gone.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            self.receiver.changed().await.ok()?;
            let current = self.receiver.borrow_and_update().clone();
            let event = diff(&self.last, &current);
            self.last = current;
            if event.is_some() {
                return event;
            }
        }
    }

    pub fn unsubscribe(self) {
        debug!("Session subscription closed");
    }
}

//! Landing page: marketing content plus the entry points into the app.

use coachreserve_common::models::UserProfile;

use crate::messages;
use crate::router::Route;
use crate::session::{SessionContext, SessionSubscription};

/// A button on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingAction {
    pub label: &'static str,
    pub route: Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub fn features() -> impl Iterator<Item = Feature> {
    messages::FEATURES
        .iter()
        .map(|&(title, description)| Feature { title, description })
}

#[derive(Debug)]
pub struct LandingView {
    session: SessionContext,
    subscription: Option<SessionSubscription>,
    user: Option<UserProfile>,
}

impl LandingView {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            subscription: None,
            user: None,
        }
    }

    /// Reads the current session and starts following changes.
    pub fn mount(&mut self) {
        let subscription = self.session.subscribe();
        self.user = subscription.current().map(|s| s.user.clone());
        self.subscription = Some(subscription);
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Applies pending session changes. Returns whether anything changed.
    pub fn refresh(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let mut changed = false;
        while subscription.try_next().is_some() {
            changed = true;
        }
        if changed {
            self.user = subscription.current().map(|s| s.user.clone());
        }
        changed
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn primary_action(&self) -> LandingAction {
        match self.user {
            Some(_) => LandingAction {
                label: messages::ACTION_BOOK,
                route: Route::Booking,
            },
            None => LandingAction {
                label: messages::ACTION_START,
                route: Route::Auth,
            },
        }
    }

    pub fn secondary_action(&self) -> Option<LandingAction> {
        match self.user {
            Some(_) => None,
            None => Some(LandingAction {
                label: messages::ACTION_SIGN_IN,
                route: Route::Auth,
            }),
        }
    }

    /// The closing "create an account" call to action, for visitors only.
    pub fn signup_cta(&self) -> Option<LandingAction> {
        match self.user {
            Some(_) => None,
            None => Some(LandingAction {
                label: messages::CTA_SIGN_UP,
                route: Route::Auth,
            }),
        }
    }

    pub fn show_signup_cta(&self) -> bool {
        self.signup_cta().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::session_for;

    #[test]
    fn test_visitor_is_sent_to_auth() {
        let mut view = LandingView::new(SessionContext::new());
        view.mount();

        assert_eq!(view.primary_action().route, Route::Auth);
        assert_eq!(view.secondary_action().map(|a| a.label), Some("Se connecter"));
        assert!(view.show_signup_cta());
    }

    #[test]
    fn test_signed_in_user_is_sent_to_booking() {
        let mut view = LandingView::new(SessionContext::with_session(session_for("a")));
        view.mount();

        assert_eq!(view.primary_action().route, Route::Booking);
        assert_eq!(view.secondary_action(), None);
        assert!(!view.show_signup_cta());
    }

    #[test]
    fn test_follows_session_changes_while_mounted() {
        let ctx = SessionContext::new();
        let mut view = LandingView::new(ctx.clone());
        view.mount();
        assert_eq!(ctx.subscriber_count(), 1);

        ctx.set(session_for("a"));
        assert!(view.refresh());
        assert!(view.is_signed_in());

        view.unmount();
        assert_eq!(ctx.subscriber_count(), 0);
        ctx.clear();
        assert!(!view.refresh());
        assert!(view.is_signed_in());
    }

    #[test]
    fn test_three_features() {
        let titles: Vec<_> = features().map(|f| f.title).collect();
        assert_eq!(
            titles,
            vec![
                "Réservation simple",
                "Coachs qualifiés",
                "Disponibilité en temps réel"
            ]
        );
    }
}

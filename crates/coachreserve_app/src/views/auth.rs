//! Sign-up, sign-in and OAuth entry points.
//!
//! One busy flag covers every action: while a call to the auth service is
//! in flight any other action is refused before reaching the backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use coachreserve_common::error::{validation_error, CoachReserveError};
use coachreserve_common::models::{OAuthProvider, OAuthRedirect, SignUpOutcome, SignUpRequest};
use coachreserve_common::services::AuthService;
use thiserror::Error;
use tracing::{debug, info};

use crate::messages;
use crate::notify::Notifier;
use crate::router::Route;
use crate::session::{SessionContext, SessionEvent, SessionSubscription};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthViewError {
    #[error("another action is in progress")]
    Busy,

    #[error("{0}")]
    Invalid(&'static str),

    #[error(transparent)]
    Backend(#[from] CoachReserveError),
}

impl From<AuthViewError> for CoachReserveError {
    fn from(err: AuthViewError) -> Self {
        match err {
            AuthViewError::Backend(inner) => inner,
            other => validation_error(other),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl AuthForm {
    pub fn validate_sign_in(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(messages::FIELDS_REQUIRED);
        }
        Ok(())
    }

    pub fn validate_sign_up(&self) -> Result<(), &'static str> {
        self.validate_sign_in()?;
        if self.full_name.trim().is_empty() {
            return Err(messages::FULL_NAME_REQUIRED);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(messages::PASSWORD_TOO_SHORT);
        }
        Ok(())
    }
}

/// Clears the busy flag when the action ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The provider's text, or `fallback` when it has none.
fn provider_message(err: &CoachReserveError, fallback: &str) -> String {
    let message = err.user_message().trim();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

pub struct AuthView {
    auth: Arc<dyn AuthService>,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    redirect_url: String,
    form: Mutex<AuthForm>,
    busy: AtomicBool,
    subscription: Option<SessionSubscription>,
}

impl std::fmt::Debug for AuthView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthView")
            .field("redirect_url", &self.redirect_url)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl AuthView {
    /// `redirect_url` is where confirmation emails and OAuth providers send
    /// the user back to, normally the site origin with a trailing `/`.
    pub fn new(
        auth: Arc<dyn AuthService>,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            session,
            notifier,
            redirect_url: redirect_url.into(),
            form: Mutex::new(AuthForm::default()),
            busy: AtomicBool::new(false),
            subscription: None,
        }
    }

    /// Starts following the session. A visitor who is already signed in is
    /// sent home.
    pub fn mount(&mut self) -> Option<Route> {
        let subscription = self.session.subscribe();
        let signed_in = subscription.current().is_some();
        self.subscription = Some(subscription);
        signed_in.then_some(Route::Landing)
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Home once a session shows up.
    pub fn poll_redirect(&mut self) -> Option<Route> {
        let subscription = self.subscription.as_mut()?;
        let mut redirect = None;
        while let Some(event) = subscription.try_next() {
            match event {
                SessionEvent::SignedIn(_) | SessionEvent::Refreshed(_) => {
                    redirect = Some(Route::Landing)
                }
                SessionEvent::SignedOut => redirect = None,
            }
        }
        redirect
    }

    fn lock_form(&self) -> MutexGuard<'_, AuthForm> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn form(&self) -> AuthForm {
        self.lock_form().clone()
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.lock_form().email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        self.lock_form().password = password.into();
    }

    pub fn set_full_name(&self, full_name: impl Into<String>) {
        self.lock_form().full_name = full_name.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    fn begin(&self) -> Result<BusyGuard<'_>, AuthViewError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!("Auth action refused, another one is in flight");
            return Err(AuthViewError::Busy);
        }
        Ok(BusyGuard(&self.busy))
    }

    fn invalid(&self, message: &'static str) -> AuthViewError {
        self.notifier.error(message);
        AuthViewError::Invalid(message)
    }

    /// Registers with email, password and display name.
    ///
    /// On success the form is cleared; if the provider confirmed the account
    /// right away the session is published.
    pub async fn sign_up(&self) -> Result<SignUpOutcome, AuthViewError> {
        let _busy = self.begin()?;
        let form = self.form();
        form.validate_sign_up().map_err(|m| self.invalid(m))?;

        let request = SignUpRequest {
            email: form.email,
            password: form.password,
            display_name: form.full_name.trim().to_string(),
            redirect_to: self.redirect_url.clone(),
        };

        match self.auth.sign_up(request).await {
            Ok(outcome) => {
                self.notifier.success(messages::SIGN_UP_SUCCESS);
                *self.lock_form() = AuthForm::default();
                if let SignUpOutcome::Session(session) = &outcome {
                    self.session.set(session.clone());
                }
                info!("Sign-up accepted");
                Ok(outcome)
            }
            Err(e) => {
                self.notifier
                    .error(&provider_message(&e, messages::SIGN_UP_FAILED));
                Err(e.into())
            }
        }
    }

    /// Signs in with email and password and publishes the session.
    ///
    /// Navigation is left to [`poll_redirect`](Self::poll_redirect).
    pub async fn sign_in(&self) -> Result<(), AuthViewError> {
        let _busy = self.begin()?;
        let form = self.form();
        form.validate_sign_in().map_err(|m| self.invalid(m))?;

        match self
            .auth
            .sign_in_with_password(&form.email, &form.password)
            .await
        {
            Ok(session) => {
                self.notifier.success(messages::SIGN_IN_SUCCESS);
                self.session.set(session);
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&provider_message(&e, messages::SIGN_IN_FAILED));
                Err(e.into())
            }
        }
    }

    /// Resolves the provider URL the user has to visit.
    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> Result<OAuthRedirect, AuthViewError> {
        let _busy = self.begin()?;

        match self.auth.oauth_authorize(provider, &self.redirect_url).await {
            Ok(redirect) => {
                info!(provider = %provider, "OAuth flow started");
                Ok(redirect)
            }
            Err(e) => {
                let message = e.user_message().to_string();
                self.notifier
                    .error(&messages::oauth_failed(provider, Some(&message)));
                Err(e.into())
            }
        }
    }

    /// Finishes an OAuth flow from the URL the provider sent the user back to.
    pub async fn complete_oauth(&self, redirect_url: &str) -> Result<(), AuthViewError> {
        let _busy = self.begin()?;

        match self.auth.session_from_redirect(redirect_url).await {
            Ok(session) => {
                self.notifier.success(messages::SIGN_IN_SUCCESS);
                self.session.set(session);
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&provider_message(&e, messages::SIGN_IN_FAILED));
                Err(e.into())
            }
        }
    }
}

//! The application shell: shared state, the route guard and the active page.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, Utc};
use coachreserve_common::error::{config_error, CoachReserveError};
use coachreserve_common::services::{AuthService, BookingStore, Services};
use coachreserve_config::AppConfig;
use tracing::{debug, info, warn};

use crate::messages;
use crate::notify::{Notifier, ToastQueue};
use crate::router::{guard, Route};
use crate::session::SessionContext;
use crate::views::{AuthView, AuthViewError, BookingView, LandingView};

/// Sessions expiring within this many seconds are refreshed before the
/// booking page mounts.
pub const REFRESH_MARGIN_SECS: i64 = 60;

// Landing never redirects, so any chain ends well before this.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug)]
enum ActiveView {
    None,
    Landing(LandingView),
    Auth(AuthView),
    Booking(BookingView),
}

pub struct App {
    services: Services,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    redirect_url: String,
    today: Option<NaiveDate>,
    route: Route,
    view: ActiveView,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("route", &self.route)
            .field("redirect_url", &self.redirect_url)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn landing(&self) -> Option<&LandingView> {
        match &self.view {
            ActiveView::Landing(view) => Some(view),
            _ => None,
        }
    }

    pub fn landing_mut(&mut self) -> Option<&mut LandingView> {
        match &mut self.view {
            ActiveView::Landing(view) => Some(view),
            _ => None,
        }
    }

    pub fn auth(&self) -> Option<&AuthView> {
        match &self.view {
            ActiveView::Auth(view) => Some(view),
            _ => None,
        }
    }

    pub fn booking(&self) -> Option<&BookingView> {
        match &self.view {
            ActiveView::Booking(view) => Some(view),
            _ => None,
        }
    }

    pub fn booking_mut(&mut self) -> Option<&mut BookingView> {
        match &mut self.view {
            ActiveView::Booking(view) => Some(view),
            _ => None,
        }
    }

    /// Goes to `path`, following guard and page redirects. Returns the route
    /// that ended up mounted.
    pub async fn navigate(&mut self, path: &str) -> Route {
        let mut target = Route::from_path(path);

        for _ in 0..MAX_REDIRECTS {
            if target == Route::Booking {
                self.refresh_if_expiring().await;
            }

            let decision = guard(target, self.session.snapshot().as_ref());
            if decision.is_redirect() {
                debug!(from = %target, to = %decision.target(), "Route guard redirect");
            }
            let route = decision.target();

            self.unmount();
            match self.mount(route).await {
                Some(next) => {
                    debug!(from = %route, to = %next, "Page redirect");
                    target = next;
                }
                None => {
                    info!(route = %route, "Navigated");
                    self.route = route;
                    return route;
                }
            }
        }

        warn!(path = %path, "Redirect chain too long, falling back to landing");
        self.unmount();
        self.mount(Route::Landing).await;
        self.route = Route::Landing;
        Route::Landing
    }

    fn unmount(&mut self) {
        match std::mem::replace(&mut self.view, ActiveView::None) {
            ActiveView::None => {}
            ActiveView::Landing(mut view) => view.unmount(),
            ActiveView::Auth(mut view) => view.unmount(),
            ActiveView::Booking(mut view) => view.unmount(),
        }
    }

    fn auth_view(&self) -> AuthView {
        AuthView::new(
            Arc::clone(&self.services.auth),
            self.session.clone(),
            Arc::clone(&self.notifier),
            self.redirect_url.clone(),
        )
    }

    async fn mount(&mut self, route: Route) -> Option<Route> {
        match route {
            Route::Landing => {
                let mut view = LandingView::new(self.session.clone());
                view.mount();
                self.view = ActiveView::Landing(view);
                None
            }
            Route::Auth => {
                let mut view = self.auth_view();
                let redirect = view.mount();
                self.view = ActiveView::Auth(view);
                redirect
            }
            Route::Booking => {
                let mut view = BookingView::new(
                    self.services.clone(),
                    self.session.clone(),
                    Arc::clone(&self.notifier),
                    self.today(),
                );
                let redirect = view.mount().await;
                self.view = ActiveView::Booking(view);
                redirect
            }
        }
    }

    /// Swaps a session that is about to expire for a fresh one. When that
    /// fails the session is dropped and the guard sends the user to sign in.
    async fn refresh_if_expiring(&mut self) {
        let Some(session) = self.session.snapshot() else {
            return;
        };
        if !session.expires_within(Duration::seconds(REFRESH_MARGIN_SECS), Utc::now()) {
            return;
        }

        match self.services.auth.refresh_session(&session.refresh_token).await {
            Ok(fresh) => {
                debug!(user_id = %fresh.user_id(), "Session refreshed");
                self.session.set(fresh);
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed");
                self.session.clear();
                self.notifier.error(messages::SESSION_EXPIRED);
            }
        }
    }

    /// Applies session changes seen by the active page and follows the
    /// redirect it asks for, if any.
    pub async fn poll(&mut self) -> Option<Route> {
        let redirect = match &mut self.view {
            ActiveView::None => None,
            ActiveView::Landing(view) => {
                view.refresh();
                None
            }
            ActiveView::Auth(view) => view.poll_redirect(),
            ActiveView::Booking(view) => view.poll_redirect(),
        };
        match redirect {
            Some(route) => Some(self.navigate(route.path()).await),
            None => None,
        }
    }

    /// Finishes an OAuth sign-in from the URL the provider redirected to,
    /// then goes home.
    pub async fn complete_oauth(&mut self, redirect_url: &str) -> Result<Route, AuthViewError> {
        match &self.view {
            ActiveView::Auth(view) => view.complete_oauth(redirect_url).await?,
            _ => self.auth_view().complete_oauth(redirect_url).await?,
        }
        Ok(self.navigate(Route::Landing.path()).await)
    }

    /// Signs out from the booking page and goes home. Elsewhere it only
    /// navigates home.
    pub async fn sign_out(&mut self) -> Route {
        let next = match &mut self.view {
            ActiveView::Booking(view) => view.sign_out().await,
            _ => Route::Landing,
        };
        self.navigate(next.path()).await
    }
}

/// Builds an [`App`]. Services and the redirect URL are required; the
/// session starts empty and notifications go to a [`ToastQueue`] unless set.
#[derive(Default)]
pub struct AppBuilder {
    auth: Option<Arc<dyn AuthService>>,
    store: Option<Arc<dyn BookingStore>>,
    session: Option<SessionContext>,
    notifier: Option<Arc<dyn Notifier>>,
    redirect_url: Option<String>,
    today: Option<NaiveDate>,
}

impl AppBuilder {
    pub fn with_services(mut self, services: Services) -> Self {
        self.auth = Some(services.auth);
        self.store = Some(services.store);
        self
    }

    pub fn with_auth_service(mut self, auth: Arc<dyn AuthService>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_booking_store(mut self, store: Arc<dyn BookingStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }

    /// Pins the date used as "today" by the booking page.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Takes the redirect URL from the site origin.
    pub fn from_config(self, config: &AppConfig) -> Self {
        self.with_redirect_url(config.site.redirect_url())
    }

    pub fn build(self) -> Result<App, CoachReserveError> {
        let auth = self.auth.ok_or_else(|| config_error("auth service not set"))?;
        let store = self.store.ok_or_else(|| config_error("booking store not set"))?;
        let redirect_url = self
            .redirect_url
            .ok_or_else(|| config_error("redirect URL not set"))?;

        Ok(App {
            services: Services::new(auth, store),
            session: self.session.unwrap_or_default(),
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(ToastQueue::new())),
            redirect_url,
            today: self.today,
            route: Route::Landing,
            view: ActiveView::None,
        })
    }
}

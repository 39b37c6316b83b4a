//! Booking page: club, coach and date filters, the slot list and the
//! reservation button.
//!
//! The view owns a [`BookingWizard`] and runs the fetches it hands out.
//! `request_*` return self-contained futures so a caller can run several at
//! once and hand them back in any order; the wizard's tickets decide which
//! response lands.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use coachreserve_common::error::CoachReserveError;
use coachreserve_common::models::{
    AccessToken, Club, ClubId, Coach, CoachId, Reservation, TimeSlot, TimeSlotId,
};
use coachreserve_common::services::{BookingStore, Services};
use tracing::{info, warn};

use crate::messages;
use crate::notify::Notifier;
use crate::router::Route;
use crate::session::{SessionContext, SessionEvent, SessionSubscription};
use crate::wizard::{
    Applied, BookingError, BookingOutcome, BookingWizard, ClubsFetch, CoachFetch, Fetched,
    SlotFetch,
};

fn missing_session() -> CoachReserveError {
    CoachReserveError::AuthError("no active session".to_string())
}

pub struct BookingView {
    wizard: BookingWizard,
    services: Services,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    subscription: Option<SessionSubscription>,
}

impl std::fmt::Debug for BookingView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingView")
            .field("wizard", &self.wizard)
            .field("mounted", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

impl BookingView {
    pub fn new(
        services: Services,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        today: NaiveDate,
    ) -> Self {
        Self {
            wizard: BookingWizard::new(today),
            services,
            session,
            notifier,
            subscription: None,
        }
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    /// Direct access for callers that run fetches themselves through
    /// `request_*` and `apply_*`.
    pub fn wizard_mut(&mut self) -> &mut BookingWizard {
        &mut self.wizard
    }

    /// Without a session the view asks to go to the sign-in page and fetches
    /// nothing. Otherwise it follows the session and loads the clubs.
    pub async fn mount(&mut self) -> Option<Route> {
        let subscription = self.session.subscribe();
        if subscription.current().is_none() {
            info!("Booking page needs a session");
            return Some(Route::Auth);
        }
        self.subscription = Some(subscription);

        let fetch = self.wizard.load_clubs();
        let fetched = self.request_clubs(fetch).await;
        self.apply_clubs(fetched);
        None
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Sign-in page once the session is gone.
    pub fn poll_redirect(&mut self) -> Option<Route> {
        let subscription = self.subscription.as_mut()?;
        let mut redirect = None;
        while let Some(event) = subscription.try_next() {
            redirect = match event {
                SessionEvent::SignedOut => Some(Route::Auth),
                SessionEvent::SignedIn(_) | SessionEvent::Refreshed(_) => None,
            };
        }
        redirect
    }

    fn token(&self) -> Option<AccessToken> {
        self.session.snapshot().map(|session| session.access_token)
    }

    fn store(&self) -> Arc<dyn BookingStore> {
        Arc::clone(&self.services.store)
    }

    pub fn request_clubs(
        &self,
        fetch: ClubsFetch,
    ) -> impl Future<Output = Fetched<Vec<Club>>> + Send + 'static {
        let store = self.store();
        let token = self.token();
        async move {
            let result = match token {
                Some(token) => store.list_clubs(&token).await,
                None => Err(missing_session()),
            };
            Fetched::new(fetch.ticket, result)
        }
    }

    pub fn request_coaches(
        &self,
        fetch: CoachFetch,
    ) -> impl Future<Output = Fetched<Vec<Coach>>> + Send + 'static {
        let store = self.store();
        let token = self.token();
        async move {
            let result = match token {
                Some(token) => store.list_coaches(&token, fetch.club_id).await,
                None => Err(missing_session()),
            };
            Fetched::new(fetch.ticket, result)
        }
    }

    pub fn request_slots(
        &self,
        fetch: SlotFetch,
    ) -> impl Future<Output = Fetched<Vec<TimeSlot>>> + Send + 'static {
        let store = self.store();
        let token = self.token();
        async move {
            let SlotFetch { ticket, query } = fetch;
            let result = match token {
                Some(token) => store.list_time_slots(&token, query).await,
                None => Err(missing_session()),
            };
            Fetched::new(ticket, result)
        }
    }

    fn report(&self, applied: &Applied, what: &str, message: &str) {
        if let Applied::Failed(e) = applied {
            warn!(error = %e, "Failed to load {}", what);
            self.notifier.error(message);
        }
    }

    pub fn apply_clubs(&mut self, fetched: Fetched<Vec<Club>>) -> Applied {
        let applied = self.wizard.apply_clubs(fetched);
        self.report(&applied, "clubs", messages::CLUBS_LOAD_FAILED);
        applied
    }

    pub fn apply_coaches(&mut self, fetched: Fetched<Vec<Coach>>) -> Applied {
        let applied = self.wizard.apply_coaches(fetched);
        self.report(&applied, "coaches", messages::COACHES_LOAD_FAILED);
        applied
    }

    pub fn apply_slots(&mut self, fetched: Fetched<Vec<TimeSlot>>) -> Applied {
        let applied = self.wizard.apply_slots(fetched);
        self.report(&applied, "time slots", messages::SLOTS_LOAD_FAILED);
        applied
    }

    async fn load_slots(&mut self, fetch: Option<SlotFetch>) {
        if let Some(fetch) = fetch {
            let fetched = self.request_slots(fetch).await;
            self.apply_slots(fetched);
        }
    }

    pub async fn select_club(&mut self, club_id: ClubId) -> Result<(), BookingError> {
        let fetch = self.wizard.select_club(club_id)?;
        let fetched = self.request_coaches(fetch).await;
        self.apply_coaches(fetched);
        Ok(())
    }

    pub async fn select_coach(&mut self, coach_id: CoachId) -> Result<(), BookingError> {
        let fetch = self.wizard.select_coach(coach_id)?;
        self.load_slots(fetch).await;
        Ok(())
    }

    pub async fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        let fetch = match self.wizard.select_date(date) {
            Ok(fetch) => fetch,
            Err(e) => {
                if matches!(e, BookingError::DateInPast { .. }) {
                    self.notifier.error(messages::DATE_IN_PAST);
                }
                return Err(e);
            }
        };
        self.load_slots(fetch).await;
        Ok(())
    }

    /// Reserves a displayed slot for the signed-in user.
    ///
    /// On success the slot list is fetched again, so the booked slot drops
    /// out. On failure the list stays as it was; a slot taken by someone else
    /// in the meantime gets its own message.
    pub async fn book(&mut self, slot_id: TimeSlotId) -> Result<Reservation, BookingError> {
        let session = self.session.snapshot();
        let insert = match self.wizard.begin_booking(slot_id, session.as_ref()) {
            Ok(insert) => insert,
            Err(e) => {
                let message = match &e {
                    BookingError::NotSignedIn => messages::SESSION_EXPIRED,
                    BookingError::Busy => messages::ACTION_IN_PROGRESS,
                    _ => messages::BOOKING_FAILED,
                };
                self.notifier.error(message);
                return Err(e);
            }
        };

        let result = match session {
            Some(session) => {
                self.services
                    .store
                    .create_reservation(&session.access_token, insert)
                    .await
            }
            None => Err(missing_session()),
        };

        match self.wizard.finish_booking(result) {
            BookingOutcome::Booked {
                reservation,
                refetch,
            } => {
                info!(reservation_id = %reservation.id, slot_id = %slot_id, "Reservation confirmed");
                self.notifier.success(messages::BOOKING_SUCCESS);
                self.load_slots(refetch).await;
                Ok(reservation)
            }
            BookingOutcome::Failed(e) => {
                warn!(error = %e, slot_id = %slot_id, "Reservation failed");
                if e.is_conflict() {
                    self.notifier.error(messages::BOOKING_CONFLICT);
                } else {
                    let message = e.user_message().trim();
                    self.notifier.error(if message.is_empty() {
                        messages::BOOKING_FAILED
                    } else {
                        message
                    });
                }
                Err(BookingError::Backend(e))
            }
        }
    }

    /// Ends the session and goes home. The local session is dropped even if
    /// the provider call fails.
    pub async fn sign_out(&mut self) -> Route {
        if let Some(token) = self.token() {
            if let Err(e) = self.services.auth.sign_out(&token).await {
                warn!(error = %e, "Sign-out request failed");
                self.notifier.error(messages::SIGN_OUT_FAILED);
            }
        }
        self.unmount();
        self.session.clear();
        Route::Landing
    }

    pub fn back(&self) -> Route {
        Route::Landing
    }

    /// Heading above the slot list, e.g. `"lundi 10 juin 2024"`.
    pub fn slot_heading(&self) -> Option<String> {
        self.wizard.selected_date().map(messages::long_date)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.wizard.shows_no_slots().then_some(messages::NO_SLOTS)
    }
}

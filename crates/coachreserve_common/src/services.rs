// --- File: crates/coachreserve_common/src/services.rs ---
//! Service abstractions for the hosted backend.
//!
//! Views talk to the auth provider and the data store only through these
//! traits. They are object-safe so the application holds `Arc<dyn ...>`
//! handles and tests can inject in-memory fakes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::CoachReserveError;
use crate::models::{
    AccessToken, Club, ClubId, Coach, NewReservation, OAuthProvider, OAuthRedirect, Reservation,
    Session, SignUpOutcome, SignUpRequest, SlotQuery, TimeSlot, UserProfile,
};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Result alias for service calls.
pub type ServiceFuture<'a, T> = BoxFuture<'a, T, CoachReserveError>;

/// Operations offered by the authentication provider.
///
/// Errors carry the provider's message text unchanged.
pub trait AuthService: Send + Sync {
    /// Register a new account. `redirect_to` is where the confirmation email links.
    fn sign_up(&self, request: SignUpRequest) -> ServiceFuture<'_, SignUpOutcome>;

    /// Exchange email and password for a session.
    fn sign_in_with_password(&self, email: &str, password: &str) -> ServiceFuture<'_, Session>;

    /// Resolve the URL that starts the provider's OAuth flow.
    ///
    /// Fails when the provider is disabled or otherwise rejected.
    fn oauth_authorize(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> ServiceFuture<'_, OAuthRedirect>;

    /// Complete an OAuth flow from the URL the provider redirected back to.
    fn session_from_redirect(&self, redirect_url: &str) -> ServiceFuture<'_, Session>;

    /// Trade a refresh token for a fresh session.
    fn refresh_session(&self, refresh_token: &str) -> ServiceFuture<'_, Session>;

    /// Fetch the user behind an access token.
    fn get_user(&self, access_token: &AccessToken) -> ServiceFuture<'_, UserProfile>;

    /// Revoke the session behind an access token.
    fn sign_out(&self, access_token: &AccessToken) -> ServiceFuture<'_, ()>;
}

/// Read and insert operations against the booking tables.
///
/// Every call runs with the signed-in user's token.
pub trait BookingStore: Send + Sync {
    /// All clubs, ordered by name.
    fn list_clubs(&self, token: &AccessToken) -> ServiceFuture<'_, Vec<Club>>;

    /// Coaches of one club, ordered by name.
    fn list_coaches(&self, token: &AccessToken, club_id: ClubId) -> ServiceFuture<'_, Vec<Coach>>;

    /// Slots matching every filter of `query`, ordered by start time.
    fn list_time_slots(
        &self,
        token: &AccessToken,
        query: SlotQuery,
    ) -> ServiceFuture<'_, Vec<TimeSlot>>;

    /// Insert one reservation and return the stored row.
    fn create_reservation(
        &self,
        token: &AccessToken,
        reservation: NewReservation,
    ) -> ServiceFuture<'_, Reservation>;
}

/// Shared handles to the backend services.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub store: Arc<dyn BookingStore>,
}

impl Services {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn BookingStore>) -> Self {
        Self { auth, store }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

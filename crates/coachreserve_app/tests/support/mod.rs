// Shared in-memory backends for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use coachreserve_app::views::{AuthView, BookingView};
use coachreserve_app::{App, SessionContext, ToastQueue};
use coachreserve_common::models::{
    AccessToken, Club, ClubId, ClubRef, Coach, CoachId, CoachRef, NewReservation, OAuthProvider,
    OAuthRedirect, Reservation, ReservationId, Session, SignUpOutcome, SignUpRequest, SlotQuery,
    SlotStatus, TimeSlot, TimeSlotId, UserId, UserProfile,
};
use coachreserve_common::services::{AuthService, BookingStore, ServiceFuture, Services};
use coachreserve_common::CoachReserveError;
use uuid::Uuid;

pub const REDIRECT_URL: &str = "https://coachreserve.test/";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn user_id(name: &str) -> UserId {
    let id = name
        .bytes()
        .fold(0u128, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u128));
    UserId::new(Uuid::from_u128(id))
}

/// A long-lived session for `name`.
pub fn session_for(name: &str) -> Session {
    Session {
        user: UserProfile {
            id: user_id(name),
            email: Some(name.to_string()),
            display_name: None,
        },
        access_token: AccessToken::new(format!("{}-token", name)),
        refresh_token: format!("{}-refresh", name),
        expires_at: Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).single(),
    }
}

/// A session whose token expired long ago.
pub fn expired_session(name: &str) -> Session {
    Session {
        expires_at: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single(),
        ..session_for(name)
    }
}

// --- Auth ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    SignUp(SignUpRequest),
    SignIn { email: String, password: String },
    OAuth { provider: OAuthProvider, redirect_to: String },
    FromRedirect(String),
    Refresh(String),
    SignOut(String),
}

#[derive(Default)]
pub struct FakeAuth {
    calls: Mutex<Vec<AuthCall>>,
    sign_in_error: Mutex<Option<CoachReserveError>>,
    oauth_error: Mutex<Option<CoachReserveError>>,
    refresh_error: Mutex<Option<CoachReserveError>>,
    auto_confirm: AtomicBool,
    slow: AtomicBool,
}

impl FakeAuth {
    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reject_sign_in(&self, message: &str) {
        *self.sign_in_error.lock().unwrap() = Some(CoachReserveError::AuthError(message.to_string()));
    }

    pub fn reject_oauth(&self, message: &str) {
        *self.oauth_error.lock().unwrap() =
            Some(CoachReserveError::ValidationError(message.to_string()));
    }

    pub fn reject_refresh(&self) {
        *self.refresh_error.lock().unwrap() = Some(CoachReserveError::AuthError(
            "Invalid Refresh Token".to_string(),
        ));
    }

    pub fn auto_confirm(&self) {
        self.auto_confirm.store(true, Ordering::SeqCst);
    }

    /// Makes every call yield once before answering.
    pub fn slow(&self) {
        self.slow.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: AuthCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        if self.slow.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

impl AuthService for FakeAuth {
    fn sign_up(&self, request: SignUpRequest) -> ServiceFuture<'_, SignUpOutcome> {
        Box::pin(async move {
            self.record(AuthCall::SignUp(request.clone()));
            self.pause().await;
            if self.auto_confirm.load(Ordering::SeqCst) {
                Ok(SignUpOutcome::Session(session_for(&request.email)))
            } else {
                Ok(SignUpOutcome::ConfirmationSent {
                    email: request.email,
                })
            }
        })
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> ServiceFuture<'_, Session> {
        let email = email.to_string();
        let password = password.to_string();
        Box::pin(async move {
            self.record(AuthCall::SignIn {
                email: email.clone(),
                password,
            });
            self.pause().await;
            match self.sign_in_error.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(session_for(&email)),
            }
        })
    }

    fn oauth_authorize(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> ServiceFuture<'_, OAuthRedirect> {
        let redirect_to = redirect_to.to_string();
        Box::pin(async move {
            self.record(AuthCall::OAuth {
                provider,
                redirect_to: redirect_to.clone(),
            });
            self.pause().await;
            match self.oauth_error.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(OAuthRedirect {
                    provider,
                    url: format!(
                        "https://accounts.example/{}?redirect_to={}",
                        provider.as_str(),
                        redirect_to
                    ),
                }),
            }
        })
    }

    fn session_from_redirect(&self, redirect_url: &str) -> ServiceFuture<'_, Session> {
        let redirect_url = redirect_url.to_string();
        Box::pin(async move {
            self.record(AuthCall::FromRedirect(redirect_url.clone()));
            if redirect_url.contains("error=") {
                return Err(CoachReserveError::AuthError(
                    "access denied by provider".to_string(),
                ));
            }
            Ok(session_for("oauth-user"))
        })
    }

    fn refresh_session(&self, refresh_token: &str) -> ServiceFuture<'_, Session> {
        let refresh_token = refresh_token.to_string();
        Box::pin(async move {
            self.record(AuthCall::Refresh(refresh_token.clone()));
            if let Some(err) = self.refresh_error.lock().unwrap().clone() {
                return Err(err);
            }
            let name = refresh_token.trim_end_matches("-refresh");
            Ok(Session {
                access_token: AccessToken::new(format!("{}-fresh", name)),
                ..session_for(name)
            })
        })
    }

    fn get_user(&self, access_token: &AccessToken) -> ServiceFuture<'_, UserProfile> {
        let name = access_token.as_str().trim_end_matches("-token").to_string();
        Box::pin(async move { Ok(session_for(&name).user) })
    }

    fn sign_out(&self, access_token: &AccessToken) -> ServiceFuture<'_, ()> {
        let token = access_token.as_str().to_string();
        Box::pin(async move {
            self.record(AuthCall::SignOut(token));
            Ok(())
        })
    }
}

// --- Store ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Clubs,
    Coaches(ClubId),
    Slots(SlotQuery),
    Reserve(NewReservation),
}

pub struct FakeStore {
    clubs: Vec<Club>,
    coaches: Vec<Coach>,
    slots: Mutex<Vec<TimeSlot>>,
    reservations: Mutex<Vec<Reservation>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_lists: AtomicBool,
    reservation_error: Mutex<Option<CoachReserveError>>,
    next_id: AtomicU64,
}

pub fn club_a() -> Club {
    Club {
        id: ClubId::new(Uuid::from_u128(0xA)),
        name: "Club A".to_string(),
        address: "1 quai du Mont-Blanc".to_string(),
    }
}

pub fn club_b() -> Club {
    Club {
        id: ClubId::new(Uuid::from_u128(0xB)),
        name: "Club B".to_string(),
        address: "8 rue de Lausanne".to_string(),
    }
}

pub fn coach_x() -> Coach {
    Coach {
        id: CoachId::new(Uuid::from_u128(0x100)),
        name: "Coach X".to_string(),
        specialty: "Musculation".to_string(),
        club_id: club_a().id,
    }
}

pub fn coach_y() -> Coach {
    Coach {
        id: CoachId::new(Uuid::from_u128(0x200)),
        name: "Coach Y".to_string(),
        specialty: "Yoga".to_string(),
        club_id: club_b().id,
    }
}

pub fn slot_id(n: u128) -> TimeSlotId {
    TimeSlotId::new(Uuid::from_u128(0x1000 + n))
}

fn slot(n: u128, coach: &Coach, club: &Club, date: NaiveDate, hour: u32) -> TimeSlot {
    TimeSlot {
        id: slot_id(n),
        slot_date: date,
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
        status: SlotStatus::Available,
        club: Some(ClubRef {
            name: club.name.clone(),
        }),
        coach: Some(CoachRef {
            name: coach.name.clone(),
            specialty: coach.specialty.clone(),
        }),
    }
}

/// The 09:00 slot of Coach X on `today()`.
pub fn nine_am() -> TimeSlotId {
    slot_id(1)
}

/// The 14:00 slot of Coach X on `today()`.
pub fn two_pm() -> TimeSlotId {
    slot_id(2)
}

impl FakeStore {
    /// Two clubs with one coach each. Coach X has a 14:00 and a 09:00 slot
    /// on `today()` (stored out of order) plus one already booked at 11:00
    /// and one on the next day. Coach Y has a 10:00 slot on `today()`.
    pub fn seeded() -> Self {
        let day = today();
        let next_day = day.succ_opt().unwrap();
        let mut booked = slot(3, &coach_x(), &club_a(), day, 11);
        booked.status = SlotStatus::Booked;

        Self {
            clubs: vec![club_a(), club_b()],
            coaches: vec![coach_x(), coach_y()],
            slots: Mutex::new(vec![
                slot(2, &coach_x(), &club_a(), day, 14),
                slot(1, &coach_x(), &club_a(), day, 9),
                booked,
                slot(4, &coach_x(), &club_a(), next_day, 9),
                slot(5, &coach_y(), &club_b(), day, 10),
            ]),
            reservations: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_lists: AtomicBool::new(false),
            reservation_error: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn slot_queries(&self) -> Vec<SlotQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Slots(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.reservations.lock().unwrap().clone()
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn reject_reservation(&self, err: CoachReserveError) {
        *self.reservation_error.lock().unwrap() = Some(err);
    }

    /// Books a slot behind the client's back.
    pub fn book_elsewhere(&self, id: TimeSlotId) {
        for slot in self.slots.lock().unwrap().iter_mut() {
            if slot.id == id {
                slot.status = SlotStatus::Booked;
            }
        }
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn list_failure(&self) -> Option<CoachReserveError> {
        self.fail_lists
            .load(Ordering::SeqCst)
            .then(|| CoachReserveError::HttpError("connection reset".to_string()))
    }
}

impl BookingStore for FakeStore {
    fn list_clubs(&self, _token: &AccessToken) -> ServiceFuture<'_, Vec<Club>> {
        Box::pin(async move {
            self.record(StoreCall::Clubs);
            if let Some(err) = self.list_failure() {
                return Err(err);
            }
            let mut clubs = self.clubs.clone();
            clubs.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(clubs)
        })
    }

    fn list_coaches(&self, _token: &AccessToken, club_id: ClubId) -> ServiceFuture<'_, Vec<Coach>> {
        Box::pin(async move {
            self.record(StoreCall::Coaches(club_id));
            if let Some(err) = self.list_failure() {
                return Err(err);
            }
            let mut coaches: Vec<Coach> = self
                .coaches
                .iter()
                .filter(|coach| coach.club_id == club_id)
                .cloned()
                .collect();
            coaches.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(coaches)
        })
    }

    fn list_time_slots(
        &self,
        _token: &AccessToken,
        query: SlotQuery,
    ) -> ServiceFuture<'_, Vec<TimeSlot>> {
        Box::pin(async move {
            self.record(StoreCall::Slots(query.clone()));
            if let Some(err) = self.list_failure() {
                return Err(err);
            }
            let all = self.slots.lock().unwrap().clone();
            let mut slots: Vec<TimeSlot> = all
                .into_iter()
                .filter(|slot| {
                    slot.slot_date == query.date
                        && slot.status == query.status
                        && self.matches(slot, query.club_id, query.coach_id)
                })
                .collect();
            slots.sort_by_key(|slot| slot.start_time);
            Ok(slots)
        })
    }

    fn create_reservation(
        &self,
        _token: &AccessToken,
        reservation: NewReservation,
    ) -> ServiceFuture<'_, Reservation> {
        Box::pin(async move {
            self.record(StoreCall::Reserve(reservation.clone()));
            if let Some(err) = self.reservation_error.lock().unwrap().clone() {
                return Err(err);
            }

            let mut slots = self.slots.lock().unwrap();
            let slot = slots
                .iter_mut()
                .find(|slot| slot.id == reservation.time_slot_id)
                .ok_or_else(|| CoachReserveError::NotFoundError("time slot".to_string()))?;
            if slot.status != SlotStatus::Available {
                return Err(CoachReserveError::ConflictError(
                    "duplicate key value violates unique constraint".to_string(),
                ));
            }
            slot.status = SlotStatus::Booked;

            let stored = Reservation {
                id: ReservationId::new(Uuid::from_u128(
                    self.next_id.fetch_add(1, Ordering::SeqCst) as u128,
                )),
                client_id: reservation.client_id,
                time_slot_id: reservation.time_slot_id,
                status: reservation.status,
                created_at: None,
            };
            self.reservations.lock().unwrap().push(stored.clone());
            Ok(stored)
        })
    }
}

impl FakeStore {
    // Slots carry club and coach names only, so match through the seeded rows.
    fn matches(&self, slot: &TimeSlot, club_id: ClubId, coach_id: CoachId) -> bool {
        let Some(coach) = self.coaches.iter().find(|coach| coach.id == coach_id) else {
            return false;
        };
        let Some(club) = self.clubs.iter().find(|club| club.id == club_id) else {
            return false;
        };
        slot.coach.as_ref().map(|c| c.name.as_str()) == Some(coach.name.as_str())
            && slot.club.as_ref().map(|c| c.name.as_str()) == Some(club.name.as_str())
    }
}

// --- Wiring ---

pub struct Harness {
    pub auth: Arc<FakeAuth>,
    pub store: Arc<FakeStore>,
    pub toasts: ToastQueue,
    pub session: SessionContext,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            auth: Arc::new(FakeAuth::default()),
            store: Arc::new(FakeStore::seeded()),
            toasts: ToastQueue::new(),
            session: SessionContext::new(),
        }
    }

    pub fn signed_in(name: &str) -> Self {
        let harness = Self::new();
        harness.session.set(session_for(name));
        harness
    }

    pub fn services(&self) -> Services {
        Services::new(self.auth.clone(), self.store.clone())
    }

    pub fn app(&self) -> App {
        App::builder()
            .with_services(self.services())
            .with_session(self.session.clone())
            .with_notifier(Arc::new(self.toasts.clone()))
            .with_redirect_url(REDIRECT_URL)
            .with_today(today())
            .build()
            .unwrap()
    }

    pub fn auth_view(&self) -> AuthView {
        AuthView::new(
            self.auth.clone(),
            self.session.clone(),
            Arc::new(self.toasts.clone()),
            REDIRECT_URL,
        )
    }

    pub fn booking_view(&self) -> BookingView {
        BookingView::new(
            self.services(),
            self.session.clone(),
            Arc::new(self.toasts.clone()),
            today(),
        )
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .drain()
            .into_iter()
            .map(|toast| toast.message)
            .collect()
    }
}

// --- File: crates/coachreserve_common/src/models.rs ---

//! Records mirrored from the hosted store and the auth provider.
//!
//! These are passive copies: the backend creates, updates and deletes them,
//! the client only reads them (and inserts reservations).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Primary key of a row in `clubs`.
    ClubId
);
uuid_id!(
    /// Primary key of a row in `coaches`.
    CoachId
);
uuid_id!(
    /// Primary key of a row in `time_slots`.
    TimeSlotId
);
uuid_id!(
    /// Primary key of a row in `reservations`.
    ReservationId
);
uuid_id!(
    /// Auth provider user id; also the `client_id` of reservations.
    UserId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub address: String,
}

impl Club {
    /// Option label in the club picker: `"name - address"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub name: String,
    pub specialty: String,
    pub club_id: ClubId,
}

impl Coach {
    /// Option label in the coach picker: `"name - specialty"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.specialty)
    }
}

/// Status column of `time_slots`. Unknown values are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlotStatus {
    Available,
    Booked,
    Other(String),
}

impl SlotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Other(s) => s,
        }
    }
}

impl From<String> for SlotStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "available" => SlotStatus::Available,
            "booked" => SlotStatus::Booked,
            _ => SlotStatus::Other(value),
        }
    }
}

impl From<SlotStatus> for String {
    fn from(value: SlotStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Club columns embedded in a time slot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubRef {
    pub name: String,
}

/// Coach columns embedded in a time slot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachRef {
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    #[serde(rename = "clubs", default)]
    pub club: Option<ClubRef>,
    #[serde(rename = "coaches", default)]
    pub coach: Option<CoachRef>,
}

impl TimeSlot {
    /// `"09:00 - 10:00"`
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    /// `"name - specialty"` of the embedded coach, when the join returned one.
    pub fn coach_label(&self) -> Option<String> {
        self.coach
            .as_ref()
            .map(|coach| format!("{} - {}", coach.name, coach.specialty))
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

/// Filters of the slot listing. Built by the booking wizard only once club,
/// coach and date are all chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub club_id: ClubId,
    pub coach_id: CoachId,
    pub date: NaiveDate,
    pub status: SlotStatus,
}

impl SlotQuery {
    /// The only query the wizard issues: open slots for one coach on one day.
    pub fn available(club_id: ClubId, coach_id: CoachId, date: NaiveDate) -> Self {
        Self {
            club_id,
            coach_id,
            date,
            status: SlotStatus::Available,
        }
    }
}

/// Status column of `reservations`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Other(String),
}

impl ReservationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Other(s) => s,
        }
    }
}

impl From<String> for ReservationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Other(value),
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(value: ReservationStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Insert payload for `reservations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub client_id: UserId,
    pub time_slot_id: TimeSlotId,
    pub status: ReservationStatus,
}

impl NewReservation {
    pub fn confirmed(client_id: UserId, time_slot_id: TimeSlotId) -> Self {
        Self {
            client_id,
            time_slot_id,
            status: ReservationStatus::Confirmed,
        }
    }
}

/// A reservation row as returned after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: UserId,
    pub time_slot_id: TimeSlotId,
    pub status: ReservationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Bearer token of a signed-in user. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The signed-in user as the application sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Display name, then email, then the raw id.
    pub fn greeting_name(&self) -> String {
        match (&self.display_name, &self.email) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(email)) => email.clone(),
            _ => self.id.to_string(),
        }
    }
}

/// An authenticated session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub access_token: AccessToken,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// True when the token expires before `now + margin`. Sessions without an
    /// expiry never need refreshing.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + margin,
            None => false,
        }
    }
}

/// Identity providers offered on the sign-in page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Facebook,
    Apple,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Facebook,
        OAuthProvider::Apple,
    ];

    /// Provider name as the auth service expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
            OAuthProvider::Apple => "apple",
        }
    }

    /// Provider name for buttons: "Google", "Facebook", "Apple".
    pub fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Facebook => "Facebook",
            OAuthProvider::Apple => "Apple",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "facebook" => Ok(OAuthProvider::Facebook),
            "apple" => Ok(OAuthProvider::Apple),
            other => Err(format!("unsupported provider: {}", other)),
        }
    }
}

/// Sign-up form contents plus where the confirmation email should link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub redirect_to: String,
}

/// What the provider did with a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Auto-confirmed project: the user is signed in right away.
    Session(Session),
    /// A confirmation email was sent; no session yet.
    ConfirmationSent { email: String },
}

/// Where to send the browser to start an OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

//! Wire shapes of the auth service (GoTrue) that do not leak past this crate.
//!
//! Data rows (`clubs`, `coaches`, `time_slots`, `reservations`) deserialize
//! straight into the shared models; only auth payloads need translating.

use chrono::{DateTime, Duration, Utc};
use coachreserve_common::models::{AccessToken, Session, UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// `user_metadata` as written at sign-up or by an OAuth provider.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A user object from `/auth/v1/user`, `/signup` or a token response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<GoTrueUser> for UserProfile {
    fn from(user: GoTrueUser) -> Self {
        UserProfile {
            id: user.id,
            email: non_empty(user.email),
            display_name: non_empty(user.user_metadata.full_name),
        }
    }
}

/// Response of `/auth/v1/token` and of an auto-confirmed sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: GoTrueUser,
}

/// Absolute expiry from either an epoch `expires_at` or a relative `expires_in`.
pub fn expiry(
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    expires_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .or_else(|| expires_in.map(|secs| now + Duration::seconds(secs)))
}

impl TokenResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            expires_at: expiry(self.expires_at, self.expires_in, now),
            user: self.user.into(),
            access_token: AccessToken::new(self.access_token),
            refresh_token: self.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpData<'a> {
    pub full_name: &'a str,
}

/// Body of `POST /auth/v1/signup`.
#[derive(Debug, Serialize)]
pub struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpData<'a>,
}

/// Body of `POST /auth/v1/token?grant_type=password`.
#[derive(Debug, Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/v1/token?grant_type=refresh_token`.
#[derive(Debug, Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

/// Parameters the provider appends to the OAuth redirect URL.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectParams {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

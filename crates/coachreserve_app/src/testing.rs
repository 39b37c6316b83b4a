use chrono::{TimeZone, Utc};
use coachreserve_common::models::{AccessToken, Session, UserId, UserProfile};
use uuid::Uuid;

/// A session whose user id is derived from `name`. Equal names give equal
/// sessions.
pub fn session_for(name: &str) -> Session {
    let id = name
        .bytes()
        .fold(0u128, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u128));
    Session {
        user: UserProfile {
            id: UserId::new(Uuid::from_u128(id)),
            email: Some(format!("{}@example.com", name)),
            display_name: None,
        },
        access_token: AccessToken::new(name),
        refresh_token: format!("{}-refresh", name),
        expires_at: Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).single(),
    }
}

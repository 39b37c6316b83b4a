// --- File: crates/coachreserve_common/src/http.rs ---

// Include the client module
pub mod client;

use serde::Deserialize;

use crate::error::CoachReserveError;

/// Error payload shapes returned by the hosted backend.
///
/// The auth service answers with `msg` or `error_description`/`error`, the
/// REST data API with `message` plus a Postgres `code`. All fields are
/// optional so any of them deserializes.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// Postgres unique_violation, reported by the REST API in the `code` field.
pub const PG_UNIQUE_VIOLATION: &str = "23505";

impl ApiErrorBody {
    /// The most specific human-readable message the payload carries.
    pub fn message(&self) -> Option<&str> {
        [
            &self.msg,
            &self.message,
            &self.error_description,
            &self.error,
        ]
        .into_iter()
        .find_map(|field| field.as_deref().filter(|m| !m.trim().is_empty()))
    }

    /// The Postgres/auth error code as text, whatever JSON type it came in.
    pub fn code_str(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Builds the error for a non-success response from its status and raw body.
///
/// The provider's message is kept verbatim; a body that is not JSON is used
/// as the message itself. A unique violation is always a conflict.
pub fn error_from_response(status: u16, body: &str) -> CoachReserveError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

    if parsed.code_str().as_deref() == Some(PG_UNIQUE_VIOLATION) {
        return CoachReserveError::ConflictError(message);
    }

    CoachReserveError::from_status(status, message)
}

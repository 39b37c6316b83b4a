// --- File: crates/coachreserve_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all CoachReserve errors.
///
/// Backend implementations map transport and provider failures into these
/// variants; views only ever see this type. The `String` payloads carry the
/// provider's message text unchanged so it can be shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachReserveError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The auth provider rejected the credentials or the token
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Input rejected before or by the backend
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// A write collided with existing data (e.g. slot already reserved)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CoachReserveError {
    /// Maps a non-success HTTP status and the provider's message to a variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => CoachReserveError::AuthError(message),
            404 => CoachReserveError::NotFoundError(message),
            409 => CoachReserveError::ConflictError(message),
            429 => CoachReserveError::RateLimitError(message),
            _ => external_service_error("supabase", message),
        }
    }

    /// The bare message, without the variant prefix used by `Display`.
    ///
    /// This is what gets shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            CoachReserveError::HttpError(m)
            | CoachReserveError::ParseError(m)
            | CoachReserveError::ConfigError(m)
            | CoachReserveError::AuthError(m)
            | CoachReserveError::ValidationError(m)
            | CoachReserveError::ConflictError(m)
            | CoachReserveError::NotFoundError(m)
            | CoachReserveError::TimeoutError(m)
            | CoachReserveError::RateLimitError(m)
            | CoachReserveError::InternalError(m) => m,
            CoachReserveError::ExternalServiceError { message, .. } => message,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CoachReserveError::ConflictError(_))
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, CoachReserveError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, CoachReserveError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CoachReserveError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CoachReserveError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CoachReserveError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CoachReserveError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for CoachReserveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CoachReserveError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            CoachReserveError::ParseError(err.to_string())
        } else {
            CoachReserveError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CoachReserveError {
    fn from(err: serde_json::Error) -> Self {
        CoachReserveError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CoachReserveError {
    CoachReserveError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CoachReserveError {
    CoachReserveError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> CoachReserveError {
    CoachReserveError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(
    service_name: &str,
    message: T,
) -> CoachReserveError {
    CoachReserveError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

// --- File: crates/coachreserve_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Records mirrored from the backend
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, validation_error, CoachReserveError, Context,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, DEFAULT_TIMEOUT_SECS},
    error_from_response, ApiErrorBody,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_name, init_with_level, init_with_writer, log_result};

pub use services::{AuthService, BookingStore, BoxFuture, ServiceFuture, Services};

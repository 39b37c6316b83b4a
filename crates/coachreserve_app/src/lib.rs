// --- File: crates/coachreserve_app/src/lib.rs ---
//! CoachReserve client logic: session context, route guard, the three pages
//! and the booking wizard behind the booking page.
//!
//! Everything here talks to the backend through the traits in
//! `coachreserve_common::services`, so the same code runs against Supabase
//! or against in-memory fakes.

pub mod app; // Shell, routing and page lifecycle
pub mod messages; // User-facing texts
pub mod notify; // Toasts
pub mod router; // Paths and the session guard
pub mod session; // Shared session state
pub mod views; // Landing, auth and booking pages
pub mod wizard; // Booking state machine

#[cfg(test)]
mod testing;
#[cfg(test)]
mod wizard_proptest;

pub use app::{App, AppBuilder, REFRESH_MARGIN_SECS};
pub use notify::{Notification, NotificationLevel, Notifier, ToastQueue};
pub use router::{guard, Guard, Route};
pub use session::{SessionContext, SessionEvent, SessionSubscription};
pub use wizard::{Applied, BookingError, BookingOutcome, BookingWizard, Fetched, Stage};

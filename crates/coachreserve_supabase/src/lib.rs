//! Supabase backend for CoachReserve
//!
//! This crate implements the service traits of `coachreserve-common` against
//! a hosted Supabase project:
//!
//! - [`AuthService`](coachreserve_common::AuthService) over the auth API
//!   (`/auth/v1`): password sign-up and sign-in, OAuth authorize URLs for
//!   Google, Facebook and Apple, session refresh, user lookup and sign-out.
//! - [`BookingStore`](coachreserve_common::BookingStore) over the REST data
//!   API (`/rest/v1`): clubs, coaches, available time slots and reservation
//!   inserts.
//!
//! Provider messages are passed through verbatim inside
//! [`CoachReserveError`](coachreserve_common::CoachReserveError); a unique
//! violation on insert becomes a `ConflictError`.
//!
//! # Example
//!
//! ```rust,no_run
//! use coachreserve_common::{AuthService, BookingStore};
//! use coachreserve_supabase::SupabaseClient;
//! use std::sync::Arc;
//!
//! fn services(config: &coachreserve_config::AppConfig) -> (Arc<dyn AuthService>, Arc<dyn BookingStore>) {
//!     let client = Arc::new(SupabaseClient::from_app_config(config).expect("supabase client"));
//!     (client.clone(), client)
//! }
//! ```

pub mod auth;
pub mod client;
pub mod models;
pub mod rest;

pub use auth::parse_redirect_params;
pub use client::{SupabaseClient, SERVICE_NAME};

//! The three pages of the application.

pub mod auth;
pub mod booking;
pub mod landing;

pub use auth::{AuthForm, AuthView, AuthViewError};
pub use booking::BookingView;
pub use landing::{LandingAction, LandingView};

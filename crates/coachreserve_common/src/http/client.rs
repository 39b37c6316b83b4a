// --- File: crates/coachreserve_common/src/http/client.rs ---
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Creates a new HTTP client with custom configuration.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for the client
/// * `follow_redirects` - Whether the client should follow redirects
///
/// # Returns
///
/// A new reqwest::Client instance with the specified configuration
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("coachreserve/", env!("CARGO_PKG_VERSION")))
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        })
        .build()
}

//! Supabase HTTP client.
//!
//! `SupabaseClient` talks to the two hosted APIs of a Supabase project: the
//! auth service under `/auth/v1` and the REST data API under `/rest/v1`.
//! It implements [`AuthService`](coachreserve_common::AuthService) (see
//! `auth.rs`) and [`BookingStore`](coachreserve_common::BookingStore) (see
//! `rest.rs`).
//!
//! Every request carries the project's anon key in the `apikey` header;
//! calls made on behalf of a user add `Authorization: Bearer <token>`.

use coachreserve_common::error::CoachReserveError;
use coachreserve_common::http::{client::create_client, error_from_response};
use coachreserve_common::models::AccessToken;
use coachreserve_config::{AppConfig, SupabaseConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, warn};

/// Name reported in `ExternalServiceError`s raised by this crate.
pub const SERVICE_NAME: &str = "supabase";

/// Client for a Supabase project's auth and REST APIs.
#[derive(Clone)]
pub struct SupabaseClient {
    /// Regular client, follows redirects.
    pub(crate) http: Client,

    /// Client used to probe the OAuth authorize endpoint; redirects are
    /// returned to the caller instead of followed.
    pub(crate) no_redirect: Client,

    base_url: String,
    anon_key: String,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("anon_key", &"***")
            .finish()
    }
}

impl SupabaseClient {
    /// Creates a client for the project at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the anon key is empty or the HTTP clients
    /// cannot be built.
    pub fn new(config: &SupabaseConfig, timeout_secs: u64) -> Result<Self, CoachReserveError> {
        if config.anon_key.trim().is_empty() {
            return Err(CoachReserveError::ConfigError(
                "supabase.anon_key is empty".to_string(),
            ));
        }

        let http = create_client(timeout_secs, true)
            .map_err(|e| CoachReserveError::ConfigError(format!("HTTP client: {}", e)))?;
        let no_redirect = create_client(timeout_secs, false)
            .map_err(|e| CoachReserveError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            no_redirect,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Creates a client from the loaded application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, CoachReserveError> {
        Self::new(&config.supabase, config.http.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Adds the project key.
    pub(crate) fn anon(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", self.anon_key.as_str())
    }

    /// Adds the project key and the user's bearer token.
    pub(crate) fn authed(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        self.anon(builder).bearer_auth(token.as_str())
    }
}

/// Sends a request, logging transport failures.
pub(crate) async fn send(
    builder: RequestBuilder,
    operation: &str,
) -> Result<Response, CoachReserveError> {
    debug!(operation, "Sending Supabase request");
    builder.send().await.map_err(|e| {
        warn!(operation, error = %e, "Supabase request did not complete");
        CoachReserveError::from(e)
    })
}

/// Turns a non-success response into an error carrying the provider's message.
pub(crate) async fn failure(response: Response, operation: &str) -> CoachReserveError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return CoachReserveError::from(e),
    };
    let error = error_from_response(status, &body);
    warn!(operation, status, error = %error, "Supabase request failed");
    error
}

/// Reads a JSON body from a successful response.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: Response,
    operation: &str,
) -> Result<T, CoachReserveError> {
    if !response.status().is_success() {
        return Err(failure(response, operation).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(operation, error = %e, "Unexpected Supabase response body");
        CoachReserveError::ParseError(format!("{}: {}", operation, e))
    })
}

/// Accepts any successful response, discarding the body.
pub(crate) async fn expect_success(
    response: Response,
    operation: &str,
) -> Result<(), CoachReserveError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(failure(response, operation).await)
    }
}

//! `AuthService` over the Supabase auth API (GoTrue).

use chrono::Utc;
use coachreserve_common::error::{external_service_error, CoachReserveError};
use coachreserve_common::models::{
    AccessToken, OAuthProvider, OAuthRedirect, Session, SignUpOutcome, SignUpRequest, UserProfile,
};
use coachreserve_common::services::{AuthService, ServiceFuture};
use reqwest::header::LOCATION;
use tracing::{debug, info, warn};

use crate::client::{expect_success, failure, parse_json, send, SupabaseClient, SERVICE_NAME};
use crate::models::{
    expiry, GoTrueUser, PasswordGrant, RedirectParams, RefreshGrant, SignUpBody, SignUpData,
    TokenResponse,
};

/// Extracts the session parameters from an OAuth redirect URL.
///
/// The implicit flow puts them in the fragment; some providers fall back to
/// the query string, which is used when there is no fragment.
pub fn parse_redirect_params(redirect_url: &str) -> Result<RedirectParams, CoachReserveError> {
    let (without_fragment, fragment) = match redirect_url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (redirect_url, None),
    };

    let encoded = match fragment.filter(|f| !f.is_empty()) {
        Some(fragment) => fragment,
        None => without_fragment
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or(""),
    };

    serde_urlencoded::from_str(encoded)
        .map_err(|e| CoachReserveError::ParseError(format!("redirect URL: {}", e)))
}

impl SupabaseClient {
    async fn fetch_user(&self, token: &AccessToken) -> Result<UserProfile, CoachReserveError> {
        let builder = self.authed(self.http.get(self.auth_url("user")), token);
        let response = send(builder, "get_user").await?;
        let user: GoTrueUser = parse_json(response, "get_user").await?;
        Ok(user.into())
    }

    async fn token_grant<B: serde::Serialize>(
        &self,
        grant_type: &str,
        body: &B,
        operation: &str,
    ) -> Result<Session, CoachReserveError> {
        let builder = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .json(body);
        let response = send(self.anon(builder), operation).await?;
        let tokens: TokenResponse = parse_json(response, operation).await?;
        Ok(tokens.into_session(Utc::now()))
    }
}

impl AuthService for SupabaseClient {
    fn sign_up(&self, request: SignUpRequest) -> ServiceFuture<'_, SignUpOutcome> {
        Box::pin(async move {
            debug!(email = %request.email, "Signing up");
            let body = SignUpBody {
                email: &request.email,
                password: &request.password,
                data: SignUpData {
                    full_name: &request.display_name,
                },
            };
            let builder = self
                .http
                .post(self.auth_url("signup"))
                .query(&[("redirect_to", request.redirect_to.as_str())])
                .json(&body);
            let response = send(self.anon(builder), "sign_up").await?;
            let value: serde_json::Value = parse_json(response, "sign_up").await?;

            // Auto-confirmed projects answer with a full session, otherwise
            // with the pending user.
            if value.get("access_token").is_some() {
                let tokens: TokenResponse = serde_json::from_value(value)?;
                info!(email = %request.email, "Sign-up confirmed immediately");
                Ok(SignUpOutcome::Session(tokens.into_session(Utc::now())))
            } else {
                let user: GoTrueUser = serde_json::from_value(value)?;
                info!(email = %request.email, "Sign-up pending email confirmation");
                Ok(SignUpOutcome::ConfirmationSent {
                    email: user.email.unwrap_or(request.email.clone()),
                })
            }
        })
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> ServiceFuture<'_, Session> {
        let email = email.to_string();
        let password = password.to_string();

        Box::pin(async move {
            debug!(email = %email, "Signing in with password");
            let body = PasswordGrant {
                email: &email,
                password: &password,
            };
            self.token_grant("password", &body, "sign_in_with_password")
                .await
        })
    }

    fn oauth_authorize(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> ServiceFuture<'_, OAuthRedirect> {
        let redirect_to = redirect_to.to_string();

        Box::pin(async move {
            debug!(provider = %provider, "Resolving OAuth authorize URL");
            let builder = self.no_redirect.get(self.auth_url("authorize")).query(&[
                ("provider", provider.as_str()),
                ("redirect_to", redirect_to.as_str()),
            ]);
            let response = send(self.anon(builder), "oauth_authorize").await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                return match location {
                    Some(url) => Ok(OAuthRedirect { provider, url }),
                    None => Err(external_service_error(
                        SERVICE_NAME,
                        "authorize redirect without a location",
                    )),
                };
            }

            if status.is_success() {
                warn!(provider = %provider, "Authorize endpoint did not redirect");
                return Err(external_service_error(
                    SERVICE_NAME,
                    "authorize endpoint did not redirect",
                ));
            }

            Err(failure(response, "oauth_authorize").await)
        })
    }

    fn session_from_redirect(&self, redirect_url: &str) -> ServiceFuture<'_, Session> {
        let redirect_url = redirect_url.to_string();

        Box::pin(async move {
            let params = parse_redirect_params(&redirect_url)?;

            if let Some(error) = params.error {
                let message = params.error_description.unwrap_or(error);
                warn!(error = %message, "Provider returned an error to the redirect URL");
                return Err(CoachReserveError::AuthError(message));
            }

            let access_token = params.access_token.map(AccessToken::new).ok_or_else(|| {
                CoachReserveError::AuthError("access_token missing from redirect URL".to_string())
            })?;
            let refresh_token = params.refresh_token.ok_or_else(|| {
                CoachReserveError::AuthError("refresh_token missing from redirect URL".to_string())
            })?;

            let user = self.fetch_user(&access_token).await?;
            info!(user_id = %user.id, "OAuth sign-in completed");

            Ok(Session {
                user,
                access_token,
                refresh_token,
                expires_at: expiry(params.expires_at, params.expires_in, Utc::now()),
            })
        })
    }

    fn refresh_session(&self, refresh_token: &str) -> ServiceFuture<'_, Session> {
        let refresh_token = refresh_token.to_string();

        Box::pin(async move {
            debug!("Refreshing session");
            let body = RefreshGrant {
                refresh_token: &refresh_token,
            };
            self.token_grant("refresh_token", &body, "refresh_session")
                .await
        })
    }

    fn get_user(&self, access_token: &AccessToken) -> ServiceFuture<'_, UserProfile> {
        let access_token = access_token.clone();
        Box::pin(async move { self.fetch_user(&access_token).await })
    }

    fn sign_out(&self, access_token: &AccessToken) -> ServiceFuture<'_, ()> {
        let access_token = access_token.clone();

        Box::pin(async move {
            let builder = self.authed(self.http.post(self.auth_url("logout")), &access_token);
            let response = send(builder, "sign_out").await?;
            expect_success(response, "sign_out").await?;
            info!("Signed out");
            Ok(())
        })
    }
}

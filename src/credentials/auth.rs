use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{CredentialError, Session};
use crate::config::StoreConfig;
use crate::store::error::extract_error_message;

/// Client for the backend's email/password auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AuthUser {
    #[serde(default)]
    email: Option<String>,
}

/// Token response. Sign-up with email confirmation returns only the user,
/// so every field is optional.
#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    email: Option<String>,
}

/// Outcome of a sign-up request
#[derive(Debug)]
pub enum SignUpOutcome {
    /// The account is usable immediately
    SignedIn(Session),
    /// The account exists but must be confirmed before logging in
    ConfirmationRequired,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, config: &StoreConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CredentialError> {
        let body = self
            .post(
                &self.endpoint("token?grant_type=password"),
                &PasswordCredentials { email, password },
                None,
            )
            .await?;
        let response = parse_auth_response(&body)?;
        session_from_response(response, Utc::now(), Some(email))
            .ok_or_else(|| CredentialError::Unavailable("response carried no access token".into()))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, CredentialError> {
        let body = self
            .post(
                &self.endpoint("signup"),
                &PasswordCredentials { email, password },
                None,
            )
            .await?;
        let response = parse_auth_response(&body)?;
        Ok(match session_from_response(response, Utc::now(), Some(email)) {
            Some(session) => SignUpOutcome::SignedIn(session),
            None => SignUpOutcome::ConfirmationRequired,
        })
    }

    /// Exchange a refresh token for a new session. A rejected refresh token
    /// maps to `CredentialError::Expired`.
    pub async fn refresh(&self, session: &Session) -> Result<Session, CredentialError> {
        let refresh_token = session
            .refresh_token
            .as_deref()
            .ok_or(CredentialError::Expired)?;

        let body = self
            .post(
                &self.endpoint("token?grant_type=refresh_token"),
                &RefreshRequest { refresh_token },
                None,
            )
            .await
            .map_err(|e| match e {
                CredentialError::Rejected(_) => CredentialError::Expired,
                other => other,
            })?;
        let response = parse_auth_response(&body)?;
        let mut refreshed = session_from_response(response, Utc::now(), session.email.as_deref())
            .ok_or(CredentialError::Expired)?;
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = session.refresh_token.clone();
        }
        Ok(refreshed)
    }

    /// Revoke the session server-side
    pub async fn sign_out(&self, access_token: &str) -> Result<(), CredentialError> {
        self.post(
            &self.endpoint("logout"),
            &serde_json::json!({}),
            Some(access_token),
        )
        .await
        .map(|_| ())
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        access_token: Option<&str>,
    ) -> Result<String, CredentialError> {
        let mut request = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(payload);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        if status.is_client_error() {
            return Err(CredentialError::Rejected(extract_error_message(&body)));
        }
        if !status.is_success() {
            return Err(CredentialError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                extract_error_message(&body)
            )));
        }
        Ok(body)
    }
}

fn parse_auth_response(body: &str) -> Result<AuthResponse, CredentialError> {
    if body.trim().is_empty() {
        return Ok(AuthResponse::default());
    }
    serde_json::from_str(body).map_err(|e| CredentialError::Unavailable(e.to_string()))
}

/// Build a session from a token response. `expires_at` (unix seconds) wins
/// over `expires_in`; returns None when no access token was issued.
fn session_from_response(
    response: AuthResponse,
    now: DateTime<Utc>,
    fallback_email: Option<&str>,
) -> Option<Session> {
    let access_token = response.access_token.filter(|t| !t.is_empty())?;

    let expires_at = response
        .expires_at
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .or_else(|| response.expires_in.map(|secs| now + Duration::seconds(secs)));

    let email = response
        .user
        .and_then(|u| u.email)
        .or(response.email)
        .or_else(|| fallback_email.map(str::to_string));

    Some(Session::new(
        access_token,
        response.refresh_token,
        expires_at,
        email,
    ))
}

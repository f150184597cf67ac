use anyhow::{Context, Result};
use std::path::Path;

use super::auth::{AuthClient, SignUpOutcome};
use super::{clear_session, get_token_from_env, load_session, save_session, CredentialError, Session};
use crate::config::init::prompt;

/// Prompt for email and password. The password is read without echo.
fn prompt_for_credentials() -> Result<(String, String)> {
    let email = loop {
        let e = prompt("Email: ")?;
        if e.contains('@') {
            break e;
        }
        eprintln!("  Enter a valid email address.");
    };

    let password =
        rpassword::prompt_password("Password: ").context("Failed to read password from stdin")?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok((email, password))
}

/// Log in interactively and persist the resulting session
pub async fn login(auth: &AuthClient, session_path: &Path) -> Result<Session> {
    let (email, password) = prompt_for_credentials()?;

    let session = auth
        .sign_in(&email, &password)
        .await
        .context("Login failed")?;

    save_session(session_path, &session)?;
    println!(
        "Logged in as {} (session valid for {}).",
        session.email.as_deref().unwrap_or(&email),
        session.format_remaining()
    );

    Ok(session)
}

/// Create an account. Returns the session when the backend signs the user in
/// right away, None when the email must be confirmed first.
pub async fn signup(auth: &AuthClient, session_path: &Path) -> Result<Option<Session>> {
    let (email, password) = prompt_for_credentials()?;

    let confirm =
        rpassword::prompt_password("Confirm password: ").context("Failed to read password")?;
    if confirm != password {
        anyhow::bail!("Passwords do not match");
    }

    match auth
        .sign_up(&email, &password)
        .await
        .context("Signup failed")?
    {
        SignUpOutcome::SignedIn(session) => {
            save_session(session_path, &session)?;
            println!("Signup successful! Logged in as {}.", email);
            Ok(Some(session))
        }
        SignUpOutcome::ConfirmationRequired => {
            println!("Signup successful! Please confirm your email, then log in.");
            Ok(None)
        }
    }
}

/// Revoke the stored session (best effort) and delete it locally
pub async fn logout(auth: &AuthClient, session_path: &Path, verbose: bool) -> Result<()> {
    match load_session(session_path) {
        Ok(Some(session)) => {
            if let Err(e) = auth.sign_out(&session.access_token).await {
                if verbose {
                    eprintln!("Server-side logout failed: {}", e);
                }
            }
        }
        Ok(None) => {
            println!("Not logged in.");
            return Ok(());
        }
        Err(e) => {
            if verbose {
                eprintln!("Ignoring unreadable session file: {:#}", e);
            }
        }
    }

    clear_session(session_path)?;
    println!("Logged out.");
    Ok(())
}

/// Resolve an access token for data requests.
///
/// Order: ECO_CATALOG_ACCESS_TOKEN, then the stored session (refreshed once
/// if expired), then an interactive login.
pub async fn ensure_session(auth: &AuthClient, session_path: &Path, verbose: bool) -> Result<String> {
    if let Some(token) = get_token_from_env() {
        if verbose {
            eprintln!("Using access token from {}", super::ENV_TOKEN_VAR);
        }
        return Ok(token);
    }

    let stored = match load_session(session_path) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Warning: {:#}. Logging in again.", e);
            None
        }
    };

    match stored {
        Some(session) if !session.is_expired() => {
            if verbose {
                eprintln!("Session valid for {}", session.format_remaining());
            }
            Ok(session.access_token)
        }
        Some(session) => match refresh_stored(auth, session_path, &session, verbose).await {
            Ok(token) => Ok(token),
            Err(CredentialError::Expired) => {
                eprintln!("Your session has expired. Please log in again.");
                Ok(login(auth, session_path).await?.access_token)
            }
            Err(e) => Err(e).context("Failed to refresh session"),
        },
        None => {
            println!("Log in to browse the catalog.");
            Ok(login(auth, session_path).await?.access_token)
        }
    }
}

async fn refresh_stored(
    auth: &AuthClient,
    session_path: &Path,
    session: &Session,
    verbose: bool,
) -> Result<String, CredentialError> {
    if verbose {
        eprintln!("Session expired, refreshing...");
    }
    let refreshed = auth.refresh(session).await?;
    if let Err(e) = save_session(session_path, &refreshed) {
        eprintln!("Warning: failed to save refreshed session: {:#}", e);
    }
    Ok(refreshed.access_token)
}

/// Called after the data API rejected the current token. Tries one refresh
/// of the stored session, then falls back to prompting.
pub async fn reauthenticate(auth: &AuthClient, session_path: &Path, verbose: bool) -> Result<String> {
    if let Ok(Some(session)) = load_session(session_path) {
        if let Ok(token) = refresh_stored(auth, session_path, &session, verbose).await {
            return Ok(token);
        }
    }

    eprintln!();
    eprintln!("Your session was rejected (invalid or expired).");
    eprintln!("Please log in again.");
    eprintln!();

    Ok(login(auth, session_path).await?.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use chrono::{Duration, Utc};

    fn auth() -> AuthClient {
        crate::install_crypto_provider();
        AuthClient::new(
            reqwest::Client::new(),
            &StoreConfig {
                url: "http://127.0.0.1:9".to_string(),
                anon_key: "anon".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_ensure_session_uses_valid_stored_session() {
        if get_token_from_env().is_some() {
            return;
        }
        let path = std::env::temp_dir().join("eco_catalog_test_prompt_valid.json");
        let session = Session::new(
            "stored-token".to_string(),
            None,
            Some(Utc::now() + Duration::hours(1)),
            None,
        );
        save_session(&path, &session).unwrap();

        let token = ensure_session(&auth(), &path, false).await.unwrap();
        assert_eq!(token, "stored-token");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_is_expired() {
        let path = std::env::temp_dir().join("eco_catalog_test_prompt_norefresh.json");
        let session = Session::new(
            "old".to_string(),
            None,
            Some(Utc::now() - Duration::hours(1)),
            None,
        );
        let result = refresh_stored(&auth(), &path, &session, false).await;
        assert!(matches!(result, Err(CredentialError::Expired)));
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let path = std::env::temp_dir().join("eco_catalog_test_prompt_logout_none.json");
        let _ = std::fs::remove_file(&path);
        assert!(logout(&auth(), &path, false).await.is_ok());
    }
}

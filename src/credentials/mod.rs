pub mod auth;
pub mod prompt;
pub mod session;

pub use auth::AuthClient;
pub use prompt::{ensure_session, login, logout, reauthenticate, signup};
pub use session::{clear_session, get_session_path, load_session, save_session, Session};

use std::fmt;

/// Environment variable name for providing an access token without a stored session
pub const ENV_TOKEN_VAR: &str = "ECO_CATALOG_ACCESS_TOKEN";

/// Check for an access token in the ECO_CATALOG_ACCESS_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    match std::env::var(ENV_TOKEN_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[derive(Debug)]
pub enum CredentialError {
    /// The auth service refused the request (bad password, taken email, ...)
    Rejected(String),
    /// The auth service could not be reached or answered garbage
    Unavailable(String),
    /// The stored session cannot be refreshed
    Expired,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Rejected(msg) => write!(f, "{}", msg),
            CredentialError::Unavailable(msg) => write!(f, "Auth service unavailable: {}", msg),
            CredentialError::Expired => write!(f, "Session expired"),
        }
    }
}

impl std::error::Error for CredentialError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_error_display() {
        assert_eq!(
            CredentialError::Rejected("Invalid login credentials".to_string()).to_string(),
            "Invalid login credentials"
        );
        assert_eq!(CredentialError::Expired.to_string(), "Session expired");
        assert!(CredentialError::Unavailable("timeout".to_string())
            .to_string()
            .contains("timeout"));
    }
}

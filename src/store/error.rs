use std::fmt;

/// Failure of a data store request.
#[derive(Debug)]
pub enum StoreError {
    /// Token rejected (401/403); the caller should re-authenticate
    Unauthorized(String),
    /// Any other non-success status
    Http { status: u16, message: String },
    /// Connection, TLS or timeout failure before a response arrived
    Transport(String),
    /// Response body was not a JSON array of objects
    Decode(String),
}

impl StoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Unauthorized(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unauthorized(msg) => write!(f, "Not authorized: {}", msg),
            StoreError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            StoreError::Transport(msg) => write!(f, "Network error: {}", msg),
            StoreError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Pull a human-readable message out of a backend error body.
///
/// The REST and auth APIs use different shapes (`message`, `msg`,
/// `error_description`, `error`); fall back to the raw body.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

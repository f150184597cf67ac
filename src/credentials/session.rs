use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

const SESSION_VERSION: u32 = 1;

/// Refresh this long before the server-side expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A signed-in session as issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub version: u32,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        email: Option<String>,
    ) -> Self {
        Self {
            version: SESSION_VERSION,
            access_token,
            refresh_token,
            expires_at,
            email,
        }
    }

    /// True once the token is within the refresh margin of its expiry.
    /// Sessions without an expiry never expire locally.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Human-friendly remaining lifetime, e.g. "59m 12s"
    pub fn format_remaining(&self) -> String {
        match self.expires_at {
            None => "no expiry".to_string(),
            Some(expires_at) => {
                let remaining = expires_at - Utc::now();
                match remaining.to_std() {
                    Ok(d) if !d.is_zero() => {
                        let rounded = std::time::Duration::from_secs(d.as_secs());
                        humantime::format_duration(rounded).to_string()
                    }
                    _ => "expired".to_string(),
                }
            }
        }
    }
}

/// Get the default session file path (~/.config/eco-catalog/session.json)
pub fn get_session_path() -> PathBuf {
    crate::config::get_config_dir().join("session.json")
}

/// Load the stored session, if any.
///
/// If the file doesn't exist, returns None.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_session(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open session file at {}", path.display()))?;

    let session: Session = serde_json::from_reader(file).context("Failed to load session")?;

    if session.version != SESSION_VERSION {
        anyhow::bail!("Unsupported session file version: {}", session.version);
    }

    Ok(Some(session))
}

/// Owner read/write only; the file holds bearer and refresh tokens
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Save the session atomically so a crash never leaves a half-written token.
/// On unix the file is created readable by its owner only.
pub fn save_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(SESSION_FILE_MODE))
            .context("Failed to restrict session file permissions")?;
    }

    serde_json::to_writer_pretty(&mut file, session).context("Failed to serialize session")?;

    file.commit().context("Failed to save session")?;

    Ok(())
}

/// Remove the stored session. Missing files are not an error.
pub fn clear_session(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove session file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn sample(expires_at: Option<DateTime<Utc>>) -> Session {
        Session::new(
            "access".to_string(),
            Some("refresh".to_string()),
            expires_at,
            Some("user@example.com".to_string()),
        )
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let path = env::temp_dir().join("eco_catalog_test_session_missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_session(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = env::temp_dir().join("eco_catalog_test_session_roundtrip.json");
        let _ = std::fs::remove_file(&path);

        let session = sample(Some(Utc::now() + Duration::hours(1)));
        save_session(&path, &session).unwrap();

        let loaded = load_session(&path).unwrap().unwrap();
        assert_eq!(loaded, session);

        clear_session(&path).unwrap();
        assert!(load_session(&path).unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let path = env::temp_dir().join("eco_catalog_test_session_private.json");
        let _ = std::fs::remove_file(&path);

        // Start from a world-readable file to check an overwrite tightens it
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        save_session(&path, &sample(None)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode is {:o}", mode & 0o777);
        assert_eq!(load_session(&path).unwrap().unwrap().access_token, "access");

        clear_session(&path).unwrap();
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let path = env::temp_dir().join("eco_catalog_test_session_version.json");
        std::fs::write(&path, r#"{"version":9,"access_token":"a"}"#).unwrap();

        let err = load_session(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported session file version"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_clear_missing_session_is_ok() {
        let path = env::temp_dir().join("eco_catalog_test_session_never_written.json");
        assert!(clear_session(&path).is_ok());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!sample(Some(now + Duration::hours(1))).is_expired_at(now));
        assert!(sample(Some(now + Duration::seconds(30))).is_expired_at(now));
        assert!(sample(Some(now - Duration::hours(1))).is_expired_at(now));
        assert!(!sample(None).is_expired_at(now));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(sample(None).format_remaining(), "no expiry");
        assert_eq!(
            sample(Some(Utc::now() - Duration::minutes(5))).format_remaining(),
            "expired"
        );
        let remaining = sample(Some(Utc::now() + Duration::hours(2))).format_remaining();
        assert!(remaining.starts_with("1h") || remaining.starts_with("2h"));
    }
}

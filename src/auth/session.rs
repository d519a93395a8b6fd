use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Identity;

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

/// Client-side session TTL in hours. The service remains authoritative:
/// the stored token is revalidated against `/auth/me` at startup.
const SESSION_TTL_HOURS: i64 = 24 * 7;

/// The session record issued by the authentication service, cached locally
/// so a restart does not require signing in again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::hours(SESSION_TTL_HOURS);
        Utc::now() > expiry
    }

    /// The identity this session was issued for.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Disk-backed session store. Loading discards expired records.
pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load the session from disk. Returns true when a live session was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save the session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Drop the session, removing the record from disk.
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the session with freshly issued data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if a session is held
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Check if the session is live (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_dir() -> PathBuf {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "pressgate-session-test-{}-{}",
            std::process::id(),
            seq
        ))
    }

    fn session_data(created_at: DateTime<Utc>) -> SessionData {
        SessionData {
            token: "tok-123".to_string(),
            user_id: 7,
            email: "ana@example.com".to_string(),
            full_name: Some("Ana Souza".to_string()),
            created_at,
        }
    }

    #[test]
    fn test_fresh_session_is_not_expired() {
        assert!(!session_data(Utc::now()).is_expired());
    }

    #[test]
    fn test_old_session_is_expired() {
        let old = session_data(Utc::now() - Duration::hours(SESSION_TTL_HOURS + 1));
        assert!(old.is_expired());
    }

    #[test]
    fn test_identity_carries_session_fields() {
        let id = session_data(Utc::now()).identity();
        assert_eq!(id.user_id, 7);
        assert_eq!(id.email, "ana@example.com");
        assert_eq!(id.full_name.as_deref(), Some("Ana Souza"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = temp_dir();
        let mut session = Session::new(dir.clone());
        session.update(session_data(Utc::now()));
        session.save().unwrap();

        let mut loaded = Session::new(dir.clone());
        assert!(loaded.load().unwrap());
        assert_eq!(loaded.token(), Some("tok-123"));
        assert!(loaded.is_valid());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_discards_expired_session() {
        let dir = temp_dir();
        let mut session = Session::new(dir.clone());
        session.update(session_data(Utc::now() - Duration::hours(SESSION_TTL_HOURS + 1)));
        session.save().unwrap();

        let mut loaded = Session::new(dir.clone());
        assert!(!loaded.load().unwrap());
        assert!(loaded.data.is_none());
        assert!(!loaded.is_valid());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_clear_removes_record() {
        let dir = temp_dir();
        let mut session = Session::new(dir.clone());
        session.update(session_data(Utc::now()));
        session.save().unwrap();
        session.clear().unwrap();
        assert!(session.data.is_none());

        let mut reloaded = Session::new(dir.clone());
        assert!(!reloaded.load().unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_missing_file_is_not_an_error() {
        let mut session = Session::new(temp_dir());
        assert!(!session.load().unwrap());
    }
}

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app_dirs::AppDirs;
use crate::error::{QuiverError, Result};
use crate::scoring::Session;

/// Name of the single entry holding every saved session
pub const STORAGE_KEY: &str = "archery-sessions";

/// Saved sessions, kept as one list that is rewritten on every change
pub trait SessionStore {
    /// Every saved session. Missing or unreadable data reads as empty.
    fn list_sessions(&self) -> Vec<Session>;

    fn write_sessions(&self, sessions: &[Session]) -> Result<()>;

    /// Replace the session with the same id, or append it
    fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.list_sessions();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.write_sessions(&sessions)?;
        info!(id = %session.id, total = session.total_score, "saved session");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let sessions: Vec<Session> = self
            .list_sessions()
            .into_iter()
            .filter(|s| s.id != id)
            .collect();
        self.write_sessions(&sessions)?;
        info!(id, "deleted session");
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Session> {
        self.list_sessions()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| QuiverError::SessionNotFound(id.to_string()))
    }

    /// Saved sessions, most recently created first
    fn newest_first(&self) -> Vec<Session> {
        let mut sessions = self.list_sessions();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }
}

/// JSON array in a single file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::sessions_path()
            .unwrap_or_else(|| PathBuf::from(format!("{STORAGE_KEY}.json")));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn list_sessions(&self) -> Vec<Session> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), "cannot read sessions: {e}");
                }
                return Vec::new();
            }
        };

        serde_json::from_slice::<Vec<Session>>(&bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "treating unparsable sessions as empty: {e}");
            Vec::new()
        })
    }

    fn write_sessions(&self, sessions: &[Session]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(sessions)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RefCell<Vec<Session>>,
}

impl MemorySessionStore {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions: RefCell::new(sessions),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn list_sessions(&self) -> Vec<Session> {
        self.sessions.borrow().clone()
    }

    fn write_sessions(&self, sessions: &[Session]) -> Result<()> {
        *self.sessions.borrow_mut() = sessions.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SessionConfig;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn session(id: &str) -> Session {
        Session::new(id, SessionConfig::default(), Utc::now())
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("none.json"));
        assert!(store.list_sessions().is_empty());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, b"[{\"id\": ").unwrap();
        let store = FileSessionStore::with_path(&path);
        assert!(store.list_sessions().is_empty());

        // and saving over it still works
        store.save(&session("a")).unwrap();
        assert_eq!(store.list_sessions().len(), 1);
    }

    #[test]
    fn save_appends_then_replaces() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("state").join("s.json"));
        store.save(&session("a")).unwrap();
        store.save(&session("b")).unwrap();

        let mut updated = session("a");
        updated.total_score = 42;
        store.save(&updated).unwrap();

        let all = store.list_sessions();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[0].total_score, 42);
        assert_eq!(all[1].id, "b");
    }

    #[test]
    fn delete_and_find() {
        let store = MemorySessionStore::default();
        store.save(&session("a")).unwrap();
        store.save(&session("b")).unwrap();
        store.delete("a").unwrap();
        assert_matches!(store.find("a"), Err(QuiverError::SessionNotFound(id)) if id == "a");
        assert_eq!(store.find("b").unwrap().id, "b");

        // deleting an unknown id is harmless
        store.delete("zzz").unwrap();
        assert_eq!(store.list_sessions().len(), 1);
    }

    #[test]
    fn newest_first_orders_by_creation() {
        let now = Utc::now();
        let mut old = session("old");
        old.created_at = now - Duration::days(2);
        let mut new = session("new");
        new.created_at = now;
        let store = MemorySessionStore::with_sessions(vec![old, new]);
        let ids: Vec<String> = store.newest_first().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}

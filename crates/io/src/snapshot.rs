// Autosave snapshot store using SQLite

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Fixed key the autosave task writes the quote snapshot under.
pub const AUTOSAVE_KEY: &str = "quote_autosave";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    saved_at TEXT NOT NULL
);
"#;

/// Key/value snapshot store under the user data directory.
///
/// Holds serialized quote snapshots only; UI state is never persisted.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) a store at an explicit path.
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let conn = Connection::open(path).map_err(|e| e.to_string())?;
        conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }

    /// Open the default store: `<data dir>/quotegrid/autosave.db`.
    pub fn open_default() -> Result<Self, String> {
        Self::open(&Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotegrid")
            .join("autosave.db")
    }

    /// Insert or replace the value under `key`.
    pub fn put(&self, key: &str, value: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO snapshots (key, value, saved_at) VALUES (?1, ?2, ?3)",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Fetch the value under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())
    }

    /// Remove the value under `key`. Removing a missing key is fine.
    pub fn delete(&self, key: &str) -> Result<(), String> {
        self.conn
            .execute("DELETE FROM snapshots WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_delete_cycle() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(&dir.path().join("autosave.db")).unwrap();

        assert_eq!(store.get(AUTOSAVE_KEY).unwrap(), None);
        store.put(AUTOSAVE_KEY, "{\"items\":[]}").unwrap();
        assert_eq!(
            store.get(AUTOSAVE_KEY).unwrap().as_deref(),
            Some("{\"items\":[]}")
        );

        // Overwrite keeps a single row per key.
        store.put(AUTOSAVE_KEY, "second").unwrap();
        assert_eq!(store.get(AUTOSAVE_KEY).unwrap().as_deref(), Some("second"));

        store.delete(AUTOSAVE_KEY).unwrap();
        assert_eq!(store.get(AUTOSAVE_KEY).unwrap(), None);
        store.delete(AUTOSAVE_KEY).unwrap(); // idempotent
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autosave.db");
        {
            let store = SnapshotStore::open(&path).unwrap();
            store.put(AUTOSAVE_KEY, "persisted").unwrap();
        }
        let store = SnapshotStore::open(&path).unwrap();
        assert_eq!(
            store.get(AUTOSAVE_KEY).unwrap().as_deref(),
            Some("persisted")
        );
    }
}

//! Session store - persisted key-value state; the auth token lives here
//!
//! The console only ever reads the token; issuing and refreshing it is an
//! external concern.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Fixed key the bearer token is stored under
pub const TOKEN_KEY: &str = "access";

#[derive(Debug)]
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM session WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO session(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM session WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Bearer token, if a session exists
    pub fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set(TOKEN_KEY, token)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.token().unwrap(), None);

        store.set_token("bearer-123").unwrap();
        assert_eq!(store.token().unwrap(), Some("bearer-123".to_string()));

        store.set_token("bearer-456").unwrap();
        assert_eq!(store.token().unwrap(), Some("bearer-456".to_string()));

        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn unknown_keys_read_as_none() {
        let store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
    }
}

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{MurmurError, Result};
use crate::domain::Credential;
use crate::store::CredentialStore;

const TOKEN_KEY: &str = "auth_token";

pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| MurmurError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            MurmurError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn read_value(&self) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM credentials WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn save(&self, credential: &Credential) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO credentials (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![TOKEN_KEY, credential.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn read(&self) -> Option<Credential> {
        match self.read_value() {
            Ok(value) => value.and_then(Credential::new),
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {}", e);
                None
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM credentials WHERE key = ?1",
            params![TOKEN_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_when_unset() {
        let store = SqliteCredentialStore::in_memory().unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_save_and_read() {
        let store = SqliteCredentialStore::in_memory().unwrap();
        store.save(&Credential::new("abc").unwrap()).unwrap();
        assert_eq!(store.read().unwrap().as_str(), "abc");
    }

    #[test]
    fn test_save_overwrites_previous_token() {
        let store = SqliteCredentialStore::in_memory().unwrap();
        store.save(&Credential::new("old").unwrap()).unwrap();
        store.save(&Credential::new("new").unwrap()).unwrap();
        assert_eq!(store.read().unwrap().as_str(), "new");

        let conn = store.conn().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SqliteCredentialStore::in_memory().unwrap();
        store.save(&Credential::new("abc").unwrap()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_empty_stored_value_reads_as_absent() {
        let store = SqliteCredentialStore::in_memory().unwrap();
        {
            let conn = store.conn().unwrap();
            conn.execute(
                "INSERT INTO credentials (key, value, updated_at) VALUES (?1, '', ?2)",
                params![TOKEN_KEY, Utc::now().to_rfc3339()],
            )
            .unwrap();
        }
        assert!(store.read().is_none());
    }

    #[test]
    fn test_token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("murmur.db");

        {
            let store = SqliteCredentialStore::new(&path).unwrap();
            store.save(&Credential::new("persisted").unwrap()).unwrap();
        }

        let reopened = SqliteCredentialStore::new(&path).unwrap();
        assert_eq!(reopened.read().unwrap().as_str(), "persisted");
    }
}

//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.  All reads and writes go
//! through a [`Transaction`], so one logical operation either lands as a whole
//! or not at all.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

/// One atomic unit of work against the store.
///
/// Typed CRUD helpers for each table are implemented on this type in the
/// sibling modules.
pub struct Transaction<'conn> {
    inner: rusqlite::Transaction<'conn>,
}

impl Transaction<'_> {
    /// Return the connection the transaction runs on.
    pub fn conn(&self) -> &Connection {
        &self.inner
    }
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/scrub/scrub.db`
    /// - macOS:   `~/Library/Application Support/com.scrub.scrub/scrub.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\scrub\scrub\data\scrub.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "scrub", "scrub").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("scrub.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err` (the rusqlite transaction rolls back on drop).
    pub fn transaction<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let tx = Transaction {
            inner: self.conn.transaction().map_err(StoreError::from)?,
        };
        let value = f(&tx)?;
        tx.inner.commit().map_err(StoreError::from)?;
        Ok(value)
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use scrub_shared::{PeerId, PeerNamespace};

    use super::*;
    use crate::models::Peer;

    fn peer(id: i32) -> Peer {
        Peer {
            id: PeerId::new(PeerNamespace::CloudUser, id),
            access_hash: Some(1),
            title: format!("user {id}"),
        }
    }

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
        drop(db);

        // Reopening must not re-run migrations destructively.
        let mut db = Database::open_at(&path).expect("should reopen");
        db.transaction(|tx| tx.upsert_peer(&peer(1))).unwrap();
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let mut db = Database::open_in_memory().unwrap();

        let result: Result<()> = db.transaction(|tx| {
            tx.upsert_peer(&peer(1))?;
            Err(StoreError::Migration("boom".into()))
        });
        assert!(result.is_err());

        let found = db
            .transaction(|tx| tx.get_peer(PeerId::new(PeerNamespace::CloudUser, 1)))
            .unwrap();
        assert!(found.is_none());
    }
}

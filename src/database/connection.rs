//! SQLite database connection management for ChatLens.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use super::migrations;

/// Owns the `rusqlite::Connection` backing both store scopes and the
/// download history. Migrations run on every open.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path` and runs migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(&path)?;
        let db = Self { conn };
        db.run_migrations()?;
        debug!(path = %path.as_ref().display(), "database opened");
        Ok(db)
    }

    /// Opens an in-memory database, discarded on drop. Used by tests.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        migrations::run_all(&self.conn)
    }

    /// The underlying connection, for services and managers to query.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

//! The SQLite file that holds the session layout.
//!
//! Opening it brings the schema up to date, so every handle handed to a store
//! already has the `app_state` table.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::migrations;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Cannot create directory for the layout database: {0}")]
    CreateDir(std::io::Error),
    #[error("Cannot encode collection: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Connection lock poisoned by a panicking writer")]
    LockPoisoned,
}

/// Shared handle to the layout database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open the layout database at `path`, creating the file and its parent
    /// directory on first launch.
    pub fn open(path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(DatabaseError::CreateDir)?;
        }

        let mut conn = Connection::open(&path)?;
        migrations::run_migrations(&mut conn)?;
        tracing::debug!(path = %path.display(), "Layout database ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection handle for an [`AppStateStore`](super::AppStateStore).
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    #[cfg(test)]
    pub(crate) fn with_connection<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn).map_err(DatabaseError::Sqlite)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AppStateStore;
    use tempfile::tempdir;

    #[test]
    fn test_first_launch_creates_nested_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("layout.db");
        let db = Database::open(db_path.clone()).unwrap();
        assert!(db_path.exists());
        assert_eq!(db.path(), db_path.as_path());
    }

    #[test]
    fn test_schema_is_ready_after_open() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("layout.db")).unwrap();

        let tables: Vec<String> = db
            .with_connection(|conn| {
                let mut stmt =
                    conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
                let names = stmt.query_map([], |row| row.get(0))?;
                names.collect()
            })
            .unwrap();
        assert!(tables.contains(&"app_state".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_relaunch_keeps_stored_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.db");
        {
            let db = Database::open(path.clone()).unwrap();
            AppStateStore::new(db.connection())
                .set("markers", r#"[{"x":1.0,"y":2.0,"z":3.0}]"#)
                .unwrap();
        }

        let db = Database::open(path).unwrap();
        assert_eq!(
            AppStateStore::new(db.connection()).get("markers").unwrap(),
            Some(r#"[{"x":1.0,"y":2.0,"z":3.0}]"#.to_string())
        );
    }
}

//! Shared test utilities
//!
//! A database that outlives individual app "launches", so tests can reopen it
//! the way a restarted app would.

use std::path::PathBuf;

use placekeep::{Database, Position, Transform};
use tempfile::TempDir;

pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("placekeep.db")
    }

    /// Open a fresh connection, as a relaunched process would.
    pub fn open(&self) -> Database {
        Database::open(self.db_path()).expect("Failed to open database")
    }
}

/// Surface hit with identity rotation at the given point.
pub fn hit_at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Position::new(x, y, z))
}

//! Data persistence layer
//!
//! SQLite-backed key-value storage and the session collections kept in it.

mod app_state;
mod database;
mod migrations;
mod session_state;

pub use app_state::AppStateStore;
pub use database::{Database, DatabaseError};
pub use session_state::{Collection, LoadReport, SessionState, StateError};

pub mod app;
pub mod codec;
pub mod config;
pub mod data;
pub mod session;
pub mod util;

pub use app::{Command, HeadlessApp};
pub use codec::{CodecError, Position, ScalarMap, Transform, ViewpointEntry};
pub use config::Config;
pub use data::{AppStateStore, Collection, Database, SessionState, StateError};
pub use session::{
    HeadlessScene, HeadlessTracker, SceneGraph, ScreenPoint, SessionController, SessionError,
    TrackingSession,
};

//! Session reconstruction and bookkeeping
//!
//! Replays persisted markers and anchors into a live tracking session, logs
//! camera viewpoints per device, and routes user actions to the store.

mod collaborators;
mod controller;
mod headless;
mod reconstruct;
mod viewpoint;

use thiserror::Error;

use crate::codec::CodecError;
use crate::data::StateError;

pub use collaborators::{SceneGraph, ScreenPoint, TrackingSession};
pub use controller::{SessionController, StartupReport};
pub use headless::{HeadlessScene, HeadlessTracker};
pub use reconstruct::{
    reconstruct_anchors, reconstruct_markers, resume_device_ordinal, EntryFailure,
    ReconstructionReport, FIRST_DEVICE,
};
pub use viewpoint::ViewpointLogger;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No active session: the tracker has no current camera pose")]
    NoActiveSession,
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

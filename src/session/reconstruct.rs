//! Replays persisted collections into a fresh tracking session.
//!
//! A malformed entry is skipped and reported; the entries after it are still
//! replayed.

use super::{SceneGraph, TrackingSession};
use crate::codec::{decode, decode_device, decode_position, CodecError, ScalarMap};
use crate::data::Collection;

/// Device ordinal used when no viewpoint has been logged yet.
pub const FIRST_DEVICE: u32 = 1;

/// An entry that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    /// Position of the entry in its stored collection
    pub index: usize,
    pub error: CodecError,
}

/// Outcome of replaying one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionReport {
    pub collection: Collection,
    pub restored: usize,
    pub failures: Vec<EntryFailure>,
}

impl ReconstructionReport {
    fn new(collection: Collection) -> Self {
        Self {
            collection,
            restored: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn replay<T>(
    collection: Collection,
    entries: &[ScalarMap],
    decode_entry: impl Fn(&ScalarMap) -> Result<T, CodecError>,
    mut apply: impl FnMut(T),
) -> ReconstructionReport {
    let mut report = ReconstructionReport::new(collection);

    for (index, entry) in entries.iter().enumerate() {
        match decode_entry(entry) {
            Ok(value) => {
                apply(value);
                report.restored += 1;
            }
            Err(error) => {
                tracing::warn!(
                    collection = %collection,
                    index,
                    error = %error,
                    "Skipping malformed entry"
                );
                report.failures.push(EntryFailure { index, error });
            }
        }
    }

    tracing::info!(
        collection = %collection,
        restored = report.restored,
        failed = report.failures.len(),
        "Reconstructed collection"
    );
    report
}

/// Recreate markers in stored order.
pub fn reconstruct_markers<S>(entries: &[ScalarMap], scene: &mut S) -> ReconstructionReport
where
    S: SceneGraph + ?Sized,
{
    replay(Collection::Markers, entries, decode_position, |position| {
        scene.add_marker_to_scene(position)
    })
}

/// Re-register anchors with the session in stored order.
pub fn reconstruct_anchors<T>(entries: &[ScalarMap], session: &mut T) -> ReconstructionReport
where
    T: TrackingSession + ?Sized,
{
    replay(Collection::Anchors, entries, decode, |transform| {
        session.register_anchor(transform)
    })
}

/// Device ordinal tagged on the last viewpoint, or [`FIRST_DEVICE`] when none.
pub fn resume_device_ordinal(viewpoints: &[ScalarMap]) -> Result<u32, CodecError> {
    match viewpoints.last() {
        Some(last) => decode_device(last),
        None => Ok(FIRST_DEVICE),
    }
}

//! Durable marker, anchor and viewpoint collections.
//!
//! Each collection lives under its own key in the `app_state` table as a JSON
//! array of scalar maps. Appends rewrite the whole collection so the stored
//! value always equals the in-memory sequence.

use std::fmt;

use thiserror::Error;

use super::{AppStateStore, DatabaseError};
use crate::codec::{
    encode, encode_position, encode_viewpoint, Position, ScalarMap, Transform, ViewpointEntry,
};

/// One of the three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Markers,
    Anchors,
    Viewpoints,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Markers,
        Collection::Anchors,
        Collection::Viewpoints,
    ];

    /// Storage key of this collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Markers => "markers",
            Collection::Anchors => "anchors",
            Collection::Viewpoints => "viewpoints",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Corrupt state in `{collection}`: {source}")]
    CorruptState {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage write failed for {target}: {source}")]
    StorageWriteFailure {
        target: String,
        #[source]
        source: DatabaseError,
    },
    #[error("Storage read failed for `{collection}`: {source}")]
    StorageReadFailure {
        collection: Collection,
        #[source]
        source: DatabaseError,
    },
    #[error("Refusing to store non-finite value in `{collection}`")]
    NonFinite { collection: Collection },
    #[error("Dropped entry {index} of `{collection}`: value out of range")]
    NonFiniteEntry { collection: Collection, index: usize },
}

/// What could not be read at startup: whole collections replaced by empty
/// ones, and single entries dropped for holding values outside `f32` range.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub corrupt: Vec<StateError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }
}

/// In-memory copy of the persisted collections plus the store that backs them.
pub struct SessionState {
    store: AppStateStore,
    markers: Vec<ScalarMap>,
    anchors: Vec<ScalarMap>,
    viewpoints: Vec<ScalarMap>,
}

impl SessionState {
    /// Load all three collections.
    ///
    /// A missing collection is empty. A malformed one is replaced by an empty
    /// sequence and reported in the [`LoadReport`]; storage read failures abort.
    pub fn load(store: AppStateStore) -> Result<(Self, LoadReport), StateError> {
        let mut report = LoadReport::default();
        let mut state = Self {
            store,
            markers: Vec::new(),
            anchors: Vec::new(),
            viewpoints: Vec::new(),
        };

        for collection in Collection::ALL {
            match Self::read_collection(&state.store, collection) {
                Ok(entries) => {
                    *state.entries_mut(collection) =
                        retain_finite(collection, entries, &mut report);
                }
                Err(e @ StateError::CorruptState { .. }) => {
                    tracing::warn!(
                        collection = %collection,
                        error = %e,
                        "Falling back to empty collection"
                    );
                    report.corrupt.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            markers = state.markers.len(),
            anchors = state.anchors.len(),
            viewpoints = state.viewpoints.len(),
            "Loaded session state"
        );

        Ok((state, report))
    }

    /// Read one collection straight from storage.
    pub fn read_collection(
        store: &AppStateStore,
        collection: Collection,
    ) -> Result<Vec<ScalarMap>, StateError> {
        let raw = store
            .get(collection.key())
            .map_err(|source| StateError::StorageReadFailure { collection, source })?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|source| StateError::CorruptState { collection, source }),
        }
    }

    pub fn markers(&self) -> &[ScalarMap] {
        &self.markers
    }

    pub fn anchors(&self) -> &[ScalarMap] {
        &self.anchors
    }

    pub fn viewpoints(&self) -> &[ScalarMap] {
        &self.viewpoints
    }

    pub fn entries(&self, collection: Collection) -> &[ScalarMap] {
        match collection {
            Collection::Markers => &self.markers,
            Collection::Anchors => &self.anchors,
            Collection::Viewpoints => &self.viewpoints,
        }
    }

    fn entries_mut(&mut self, collection: Collection) -> &mut Vec<ScalarMap> {
        match collection {
            Collection::Markers => &mut self.markers,
            Collection::Anchors => &mut self.anchors,
            Collection::Viewpoints => &mut self.viewpoints,
        }
    }

    pub fn append_marker(&mut self, position: &Position) -> Result<(), StateError> {
        self.append(Collection::Markers, encode_position(position))
    }

    pub fn append_anchor(&mut self, transform: &Transform) -> Result<(), StateError> {
        self.append(Collection::Anchors, encode(transform))
    }

    pub fn append_viewpoint(&mut self, position: &Position, device: u32) -> Result<(), StateError> {
        let entry = ViewpointEntry {
            position: *position,
            device,
        };
        self.append(Collection::Viewpoints, encode_viewpoint(&entry))
    }

    /// Push onto the in-memory copy, then rewrite the whole collection.
    ///
    /// On a write failure the in-memory entry stays, so memory may run ahead
    /// of storage until the next successful append.
    fn append(&mut self, collection: Collection, entry: ScalarMap) -> Result<(), StateError> {
        // JSON has no representation for NaN or infinity
        if entry.values().any(|v| !v.is_finite()) {
            return Err(StateError::NonFinite { collection });
        }

        self.entries_mut(collection).push(entry);
        self.persist(collection)?;

        tracing::debug!(
            collection = %collection,
            len = self.entries(collection).len(),
            "Appended entry"
        );
        Ok(())
    }

    fn persist(&self, collection: Collection) -> Result<(), StateError> {
        let raw = serde_json::to_string(self.entries(collection)).map_err(|e| {
            StateError::StorageWriteFailure {
                target: collection.key().to_string(),
                source: DatabaseError::Encode(e),
            }
        })?;
        self.store
            .set(collection.key(), &raw)
            .map_err(|source| StateError::StorageWriteFailure {
                target: collection.key().to_string(),
                source,
            })
    }

    /// Clear all three collections in storage (one transaction), then in memory.
    pub fn reset(&mut self) -> Result<(), StateError> {
        let keys = Collection::ALL.map(Collection::key);
        self.store
            .delete_many(&keys)
            .map_err(|source| StateError::StorageWriteFailure {
                target: "reset".to_string(),
                source,
            })?;

        for collection in Collection::ALL {
            self.entries_mut(collection).clear();
        }

        tracing::info!("Session state reset");
        Ok(())
    }
}

/// Drop entries holding NaN or infinity (numbers too large for `f32` parse as
/// infinity). Kept in memory they would be rewritten as `null` on the next
/// append and make the whole collection unreadable.
fn retain_finite(
    collection: Collection,
    entries: Vec<ScalarMap>,
    report: &mut LoadReport,
) -> Vec<ScalarMap> {
    let mut kept = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.values().all(|v| v.is_finite()) {
            kept.push(entry);
        } else {
            tracing::warn!(collection = %collection, index, "Dropping non-finite entry");
            report
                .corrupt
                .push(StateError::NonFiniteEntry { collection, index });
        }
    }
    kept
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("markers", &self.markers.len())
            .field("anchors", &self.anchors.len())
            .field("viewpoints", &self.viewpoints.len())
            .finish()
    }
}

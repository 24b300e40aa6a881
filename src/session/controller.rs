//! Top-level owner of the session state.
//!
//! The controller is the only holder of [`SessionState`] and the device
//! ordinal. Collaborators are passed in per call, so the controller never
//! outlives or owns the tracker and scene.

use super::{
    reconstruct_anchors, reconstruct_markers, resume_device_ordinal, ReconstructionReport,
    SceneGraph, ScreenPoint, SessionError, TrackingSession, ViewpointLogger,
};
use crate::codec::{decode_position, decode_viewpoint, CodecError, Position, ViewpointEntry};
use crate::data::{AppStateStore, LoadReport, SessionState};

/// What happened while restoring a previous session.
#[derive(Debug)]
pub struct StartupReport {
    pub load: LoadReport,
    pub markers: ReconstructionReport,
    pub anchors: ReconstructionReport,
    /// Ordinal the device counter resumed at
    pub device: u32,
    /// Set when the last viewpoint carried no usable ordinal
    pub device_error: Option<CodecError>,
}

impl StartupReport {
    pub fn is_clean(&self) -> bool {
        self.load.is_clean()
            && self.markers.is_complete()
            && self.anchors.is_complete()
            && self.device_error.is_none()
    }
}

#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    logger: ViewpointLogger,
}

impl SessionController {
    /// Load persisted state and replay it into the given collaborators.
    pub fn start<T, S>(
        store: AppStateStore,
        tracking: &mut T,
        scene: &mut S,
    ) -> Result<(Self, StartupReport), SessionError>
    where
        T: TrackingSession + ?Sized,
        S: SceneGraph + ?Sized,
    {
        let (state, load) = SessionState::load(store)?;

        let anchors = reconstruct_anchors(state.anchors(), tracking);
        let markers = reconstruct_markers(state.markers(), scene);

        let (logger, device_error) = match resume_device_ordinal(state.viewpoints()) {
            Ok(device) => (ViewpointLogger::new(device), None),
            Err(e) => {
                tracing::warn!(error = %e, "Could not resume device ordinal");
                (ViewpointLogger::default(), Some(e))
            }
        };

        let report = StartupReport {
            load,
            markers,
            anchors,
            device: logger.device(),
            device_error,
        };

        Ok((Self { state, logger }, report))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn device(&self) -> u32 {
        self.logger.device()
    }

    /// Place a marker where the touch hits tracked geometry.
    ///
    /// The hit transform is persisted and registered as an anchor, its
    /// translation becomes the marker. Returns `None` when nothing was hit.
    pub fn handle_touch<T, S>(
        &mut self,
        point: ScreenPoint,
        tracking: &mut T,
        scene: &mut S,
    ) -> Result<Option<Position>, SessionError>
    where
        T: TrackingSession + ?Sized,
        S: SceneGraph + ?Sized,
    {
        let Some(hit) = tracking.hit_test(point) else {
            tracing::debug!(x = point.x, y = point.y, "Touch hit nothing");
            return Ok(None);
        };

        self.state.append_anchor(&hit)?;
        tracking.register_anchor(hit);

        let position = hit.translation();
        scene.add_marker_to_scene(position);
        self.state.append_marker(&position)?;

        tracing::info!(
            x = position.x,
            y = position.y,
            z = position.z,
            "Placed marker"
        );
        Ok(Some(position))
    }

    pub fn record_viewpoint<T>(&mut self, tracking: &T) -> Result<ViewpointEntry, SessionError>
    where
        T: TrackingSession + ?Sized,
    {
        self.logger.record_viewpoint(tracking, &mut self.state)
    }

    pub fn advance_device(&mut self) -> u32 {
        self.logger.advance_device()
    }

    /// Wipe markers, anchors and viewpoints. The device ordinal is kept.
    pub fn reset_all(&mut self) -> Result<(), SessionError> {
        self.state.reset()?;
        Ok(())
    }

    /// Every logged viewpoint, decoded individually so one bad entry does not
    /// hide the rest.
    pub fn viewpoint_log(&self) -> Vec<Result<ViewpointEntry, CodecError>> {
        self.state.viewpoints().iter().map(decode_viewpoint).collect()
    }

    /// Distance from the current camera to each marker, in stored order.
    pub fn marker_distances<T>(&self, tracking: &T) -> Result<Vec<f32>, SessionError>
    where
        T: TrackingSession + ?Sized,
    {
        let camera = tracking
            .current_camera_transform()
            .ok_or(SessionError::NoActiveSession)?
            .translation();

        self.state
            .markers()
            .iter()
            .map(|entry| -> Result<f32, SessionError> {
                let marker = decode_position(entry)?;
                Ok(nalgebra::distance(&marker, &camera))
            })
            .collect()
    }
}

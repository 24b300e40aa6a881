//! Stand-in collaborators for running without a real tracker.
//!
//! The tracker answers hit tests and camera queries from values set by the
//! caller and keeps every anchor it is given; the scene keeps every marker.

use super::{SceneGraph, ScreenPoint, TrackingSession};
use crate::codec::{Position, Transform};

#[derive(Debug, Clone, Default)]
pub struct HeadlessTracker {
    hit: Option<Transform>,
    camera: Option<Transform>,
    anchors: Vec<Transform>,
}

impl HeadlessTracker {
    /// Transform returned by the next hit tests, regardless of the point.
    pub fn set_hit(&mut self, hit: Option<Transform>) {
        self.hit = hit;
    }

    pub fn set_camera(&mut self, camera: Option<Transform>) {
        self.camera = camera;
    }

    pub fn anchors(&self) -> &[Transform] {
        &self.anchors
    }
}

impl TrackingSession for HeadlessTracker {
    fn hit_test(&self, _point: ScreenPoint) -> Option<Transform> {
        self.hit
    }

    fn current_camera_transform(&self) -> Option<Transform> {
        self.camera
    }

    fn register_anchor(&mut self, transform: Transform) {
        tracing::debug!(anchor = self.anchors.len(), "Registered anchor");
        self.anchors.push(transform);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    markers: Vec<Position>,
}

impl HeadlessScene {
    pub fn markers(&self) -> &[Position] {
        &self.markers
    }
}

impl SceneGraph for HeadlessScene {
    fn add_marker_to_scene(&mut self, position: Position) {
        tracing::debug!(
            marker = self.markers.len(),
            x = position.x,
            y = position.y,
            z = position.z,
            "Added marker"
        );
        self.markers.push(position);
    }
}

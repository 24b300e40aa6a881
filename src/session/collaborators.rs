//! Interfaces to the live tracker and scene.

use crate::codec::{Position, Transform};

/// A touch location in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The tracking session that owns pose estimation and anchors.
pub trait TrackingSession {
    /// World transform of the surface hit at `point`, if any.
    fn hit_test(&self, point: ScreenPoint) -> Option<Transform>;

    /// Camera transform of the current frame; `None` without a frame.
    fn current_camera_transform(&self) -> Option<Transform>;

    /// Hand an anchor to the session so it tracks it from now on.
    fn register_anchor(&mut self, transform: Transform);
}

/// The scene graph that displays markers.
pub trait SceneGraph {
    fn add_marker_to_scene(&mut self, position: Position);
}

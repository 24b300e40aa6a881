//! Camera viewpoint log across devices.
//!
//! Each physical tracking session sharing the space is a "device" with an
//! ordinal. The ordinal lives only in memory; after a restart it is recovered
//! from the last logged viewpoint.

use super::{SessionError, TrackingSession, FIRST_DEVICE};
use crate::codec::{ViewpointEntry, MAX_DEVICE};
use crate::data::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewpointLogger {
    device: u32,
}

impl Default for ViewpointLogger {
    fn default() -> Self {
        Self::new(FIRST_DEVICE)
    }
}

impl ViewpointLogger {
    pub fn new(device: u32) -> Self {
        Self {
            device: device.clamp(FIRST_DEVICE, MAX_DEVICE),
        }
    }

    /// Ordinal tagged on the next recorded viewpoint.
    pub fn device(&self) -> u32 {
        self.device
    }

    /// Move on to the next device and return its ordinal. Stops at
    /// [`MAX_DEVICE`] so every recorded ordinal reads back unchanged.
    pub fn advance_device(&mut self) -> u32 {
        self.device = (self.device + 1).min(MAX_DEVICE);
        tracing::info!(device = self.device, "Advanced device ordinal");
        self.device
    }

    /// Log the camera position of the current frame under the current device.
    pub fn record_viewpoint<T>(
        &self,
        session: &T,
        state: &mut SessionState,
    ) -> Result<ViewpointEntry, SessionError>
    where
        T: TrackingSession + ?Sized,
    {
        let camera = session
            .current_camera_transform()
            .ok_or(SessionError::NoActiveSession)?;
        let entry = ViewpointEntry {
            position: camera.translation(),
            device: self.device,
        };

        state.append_viewpoint(&entry.position, entry.device)?;

        tracing::info!(
            device = entry.device,
            x = entry.position.x,
            y = entry.position.y,
            z = entry.position.z,
            "Recorded viewpoint"
        );
        Ok(entry)
    }
}

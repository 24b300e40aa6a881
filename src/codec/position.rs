//! Position and viewpoint codec

use nalgebra::Point3;

use super::{require, CodecError, ScalarMap};

/// A point in tracked space.
pub type Position = Point3<f32>;

pub const POSITION_KEYS: [&str; 3] = ["x", "y", "z"];

/// Key tagging a viewpoint with its device ordinal.
pub const DEVICE_KEY: &str = "device";

/// Largest ordinal an `f32` holds exactly (2^24).
pub const MAX_DEVICE: u32 = 1 << 24;

/// Camera position captured on a given device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewpointEntry {
    pub position: Position,
    pub device: u32,
}

pub fn encode_position(position: &Position) -> ScalarMap {
    POSITION_KEYS
        .iter()
        .zip(position.coords.iter())
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

pub fn decode_position(map: &ScalarMap) -> Result<Position, CodecError> {
    Ok(Position::new(
        require(map, "x")?,
        require(map, "y")?,
        require(map, "z")?,
    ))
}

/// Position plus the `device` tag. The ordinal is stored as a float.
pub fn encode_viewpoint(entry: &ViewpointEntry) -> ScalarMap {
    let mut map = encode_position(&entry.position);
    map.insert(DEVICE_KEY.to_string(), entry.device as f32);
    map
}

pub fn decode_viewpoint(map: &ScalarMap) -> Result<ViewpointEntry, CodecError> {
    Ok(ViewpointEntry {
        position: decode_position(map)?,
        device: decode_device(map)?,
    })
}

/// Read only the `device` tag. Ordinals start at 1.
pub fn decode_device(map: &ScalarMap) -> Result<u32, CodecError> {
    let value = require(map, DEVICE_KEY)?;
    if value >= 1.0 && value.fract() == 0.0 && value <= MAX_DEVICE as f32 {
        Ok(value as u32)
    } else {
        Err(CodecError::InvalidOrdinal { value })
    }
}

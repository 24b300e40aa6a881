//! Flat scalar encoding for transforms and positions.
//!
//! Every persisted entry is a [`ScalarMap`]: string keys mapped to `f32`
//! values. Transforms use the sixteen `m11..m44` component keys, positions use
//! `x`, `y`, `z`, and viewpoints add a `device` ordinal.

mod position;
mod transform;

use std::collections::BTreeMap;

use thiserror::Error;

pub use position::{
    decode_device, decode_position, decode_viewpoint, encode_position, encode_viewpoint, Position,
    ViewpointEntry, DEVICE_KEY, MAX_DEVICE, POSITION_KEYS,
};
pub use transform::{decode, encode, Transform, COMPONENT_KEYS};

/// Order-independent mapping from component name to value.
pub type ScalarMap = BTreeMap<String, f32>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Missing component `{key}`")]
    MissingComponent { key: &'static str },
    #[error("Component `{key}` is not finite")]
    NonFinite { key: &'static str },
    #[error("Invalid device ordinal: {value}")]
    InvalidOrdinal { value: f32 },
}

/// Look up a required key, reporting which one is absent or unusable.
fn require(map: &ScalarMap, key: &'static str) -> Result<f32, CodecError> {
    let value = map
        .get(key)
        .copied()
        .ok_or(CodecError::MissingComponent { key })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CodecError::NonFinite { key })
    }
}

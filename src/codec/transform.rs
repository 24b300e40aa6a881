//! 4x4 transform codec

use nalgebra::Matrix4;

use super::{require, CodecError, Position, ScalarMap};

/// Component key table: key, row, column. Rows carry the translation in the
/// fourth row (`m41`, `m42`, `m43`).
pub const COMPONENT_KEYS: [(&str, usize, usize); 16] = [
    ("m11", 0, 0),
    ("m12", 0, 1),
    ("m13", 0, 2),
    ("m14", 0, 3),
    ("m21", 1, 0),
    ("m22", 1, 1),
    ("m23", 1, 2),
    ("m24", 1, 3),
    ("m31", 2, 0),
    ("m32", 2, 1),
    ("m33", 2, 2),
    ("m34", 2, 3),
    ("m41", 3, 0),
    ("m42", 3, 1),
    ("m43", 3, 2),
    ("m44", 3, 3),
];

/// Rotation and translation of a point or camera in tracked space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Matrix4<f32>);

impl Transform {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Build from row-major components (`rows[0]` is `m11..m14`).
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    /// Identity rotation placed at `position`.
    pub fn from_translation(position: Position) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(3, 0)] = position.x;
        matrix[(3, 1)] = position.y;
        matrix[(3, 2)] = position.z;
        Self(matrix)
    }

    /// Component at zero-based `row`/`col`.
    pub fn component(&self, row: usize, col: usize) -> f32 {
        self.0[(row, col)]
    }

    /// Translation row reduced to a position.
    pub fn translation(&self) -> Position {
        Position::new(self.0[(3, 0)], self.0[(3, 1)], self.0[(3, 2)])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<Matrix4<f32>> for Transform {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self(matrix)
    }
}

/// Encode all sixteen components.
pub fn encode(transform: &Transform) -> ScalarMap {
    COMPONENT_KEYS
        .iter()
        .map(|&(key, row, col)| (key.to_string(), transform.component(row, col)))
        .collect()
}

/// Decode a transform, failing on the first absent component.
pub fn decode(map: &ScalarMap) -> Result<Transform, CodecError> {
    let mut matrix = Matrix4::zeros();
    for &(key, row, col) in COMPONENT_KEYS.iter() {
        matrix[(row, col)] = require(map, key)?;
    }
    Ok(Transform(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Transform {
        Transform::from_rows([
            [0.0, -1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.25, -1.5, 3.125, 1.0],
        ])
    }

    #[test]
    fn test_encode_has_sixteen_named_components() {
        let map = encode(&sample());
        assert_eq!(map.len(), 16);
        assert_eq!(map["m12"], -1.0);
        assert_eq!(map["m21"], 1.0);
        assert_eq!(map["m41"], 0.25);
        assert_eq!(map["m43"], 3.125);
        assert_eq!(map["m44"], 1.0);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let t = sample();
        assert_eq!(decode(&encode(&t)).unwrap(), t);
    }

    #[test]
    fn test_decode_ignores_key_order_and_extra_keys() {
        let mut map: ScalarMap = encode(&sample()).into_iter().rev().collect();
        map.insert("device".to_string(), 7.0);
        assert_eq!(decode(&map).unwrap(), sample());
    }

    #[test]
    fn test_decode_missing_last_component() {
        let mut map = encode(&sample());
        map.remove("m44");
        assert_eq!(
            decode(&map),
            Err(CodecError::MissingComponent { key: "m44" })
        );
    }

    #[test]
    fn test_decode_empty_map_reports_first_key() {
        assert_eq!(
            decode(&ScalarMap::new()),
            Err(CodecError::MissingComponent { key: "m11" })
        );
    }

    #[test]
    fn test_decode_rejects_infinite_component() {
        let mut map = encode(&sample());
        map.insert("m23".to_string(), f32::INFINITY);
        assert_eq!(decode(&map), Err(CodecError::NonFinite { key: "m23" }));
    }

    #[test]
    fn test_translation_reads_fourth_row() {
        let p = sample().translation();
        assert_eq!((p.x, p.y, p.z), (0.25, -1.5, 3.125));
        assert_eq!(Transform::from_translation(p).translation(), p);
    }

    proptest! {
        #[test]
        fn prop_transform_round_trip(values in prop::array::uniform16(-1.0e6f32..1.0e6f32)) {
            let t = Transform::from(Matrix4::from_row_slice(&values));
            prop_assert_eq!(decode(&encode(&t)).unwrap(), t);
        }

        #[test]
        fn prop_any_missing_component_is_rejected(values in prop::array::uniform16(-10.0f32..10.0f32), drop in 0usize..16) {
            let t = Transform::from(Matrix4::from_row_slice(&values));
            let mut map = encode(&t);
            let (key, _, _) = COMPONENT_KEYS[drop];
            map.remove(key);
            prop_assert_eq!(decode(&map), Err(CodecError::MissingComponent { key }));
        }
    }
}

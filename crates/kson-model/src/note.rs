use serde::Serialize;
use serde::ser::{SerializeTuple, Serializer};
use serde_json::Value;

use crate::common::{GraphPoint, Pulse};
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader, element, optional_element, tuple};

pub const BT_LANES: usize = 4;
pub const FX_LANES: usize = 2;
pub const LASER_LANES: usize = 2;

/// Button note: a chip is a bare pulse, a long note is `[y, length]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ButtonNote {
    Chip(Pulse),
    Long(Pulse, Pulse),
}

impl ButtonNote {
    pub fn y(&self) -> Pulse {
        match *self {
            Self::Chip(y) | Self::Long(y, _) => y,
        }
    }

    /// Pulse at which the note ends; equal to `y` for chips.
    pub fn end(&self) -> Pulse {
        match *self {
            Self::Chip(y) => y,
            Self::Long(y, length) => y + length,
        }
    }
}

impl FromKson for ButtonNote {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        if value.is_array() {
            let (y, length) = <(Pulse, Pulse)>::from_kson(value, path)?;
            Ok(Self::Long(y, length))
        } else {
            Pulse::from_kson(value, path).map(Self::Chip)
        }
    }
}

/// `[y, points, width?]`
#[derive(Debug, Clone, PartialEq)]
pub struct LaserSection {
    pub y: Pulse,
    pub points: Vec<GraphPoint>,
    /// 1 for normal lasers, 2 for wide ("2x") lasers
    pub width: u32,
}

impl LaserSection {
    pub fn new(y: Pulse, width: u32) -> Self {
        Self {
            y,
            points: Vec::new(),
            width,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.width == 2
    }

    pub fn end(&self) -> Pulse {
        self.y + self.points.last().map_or(0, |p| p.ry)
    }
}

impl FromKson for LaserSection {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, 2, 3)?;
        Ok(Self {
            y: element(items, 0, path)?,
            points: element(items, 1, path)?,
            width: optional_element(items, 2, path)?.unwrap_or(1),
        })
    }
}

impl Serialize for LaserSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let explicit_width = self.width != 1;
        let mut seq = serializer.serialize_tuple(if explicit_width { 3 } else { 2 })?;
        seq.serialize_element(&self.y)?;
        seq.serialize_element(&self.points)?;
        if explicit_width {
            seq.serialize_element(&self.width)?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteInfo {
    pub bt: [Vec<ButtonNote>; BT_LANES],
    pub fx: [Vec<ButtonNote>; FX_LANES],
    pub laser: [Vec<LaserSection>; LASER_LANES],
}

impl NoteInfo {
    pub fn is_empty(&self) -> bool {
        self.bt.iter().all(Vec::is_empty)
            && self.fx.iter().all(Vec::is_empty)
            && self.laser.iter().all(Vec::is_empty)
    }
}

impl FromKson for NoteInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            bt: obj.or_default("bt")?,
            fx: obj.or_default("fx")?,
            laser: obj.or_default("laser")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GraphValue;
    use serde_json::json;

    #[test]
    fn test_button_lanes() {
        let note = NoteInfo::from_kson(
            &json!({ "bt": [[0, [240, 480]], [], [], [960]] }),
            FieldPath::root(),
        )
        .unwrap();
        assert_eq!(
            note.bt[0],
            vec![ButtonNote::Chip(0), ButtonNote::Long(240, 480)]
        );
        assert_eq!(note.bt[3], vec![ButtonNote::Chip(960)]);
        assert!(note.fx.iter().all(Vec::is_empty));
        assert_eq!(note.bt[0][1].end(), 720);
    }

    #[test]
    fn test_wrong_lane_count() {
        let err = NoteInfo::from_kson(&json!({ "fx": [[]] }), FieldPath::root()).unwrap_err();
        assert_eq!(err.to_string(), "fx: expected an array of 2 elements");
    }

    #[test]
    fn test_laser_width() {
        let note = NoteInfo::from_kson(
            &json!({
                "laser": [
                    [[0, [[0, 0.0], [240, 1.0]]]],
                    [[960, [[0, [1.0, 0.5]]], 2]],
                ]
            }),
            FieldPath::root(),
        )
        .unwrap();
        assert_eq!(note.laser[0][0].width, 1);
        assert_eq!(note.laser[0][0].end(), 240);
        assert!(note.laser[1][0].is_wide());
        assert_eq!(note.laser[1][0].points[0].v, GraphValue(1.0, 0.5));
    }

    #[test]
    fn test_laser_serialization_omits_default_width() {
        let mut section = LaserSection::new(0, 1);
        section.points.push(GraphPoint::new(0, GraphValue::flat(0.0)));
        assert_eq!(serde_json::to_value(&section).unwrap(), json!([0, [[0, [0.0, 0.0]]]]));

        section.width = 2;
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!([0, [[0, [0.0, 0.0]]], 2])
        );
    }

    #[test]
    fn test_chip_serializes_as_scalar() {
        let lane = vec![ButtonNote::Chip(0), ButtonNote::Long(240, 480)];
        assert_eq!(serde_json::to_value(&lane).unwrap(), json!([0, [240, 480]]));
    }
}

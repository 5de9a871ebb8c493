use serde::Serialize;
use serde::ser::{SerializeTuple, Serializer};
use serde_json::Value;

use crate::common::{ByPulse, GraphPoint, Pulse};
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader, as_int, element, optional_element, tuple};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiltInfo {
    pub scale: Vec<ByPulse<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<Vec<ByPulse<Vec<GraphPoint>>>>,
    pub keep: Vec<ByPulse<bool>>,
}

fn default_tilt_scale() -> Vec<ByPulse<f64>> {
    vec![(0, 1.0)]
}

fn default_tilt_keep() -> Vec<ByPulse<bool>> {
    vec![(0, false)]
}

impl Default for TiltInfo {
    fn default() -> Self {
        Self {
            scale: default_tilt_scale(),
            manual: None,
            keep: default_tilt_keep(),
        }
    }
}

impl FromKson for TiltInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            scale: obj.or_else("scale", default_tilt_scale)?,
            manual: obj.optional("manual")?,
            keep: obj.or_else("keep", default_tilt_keep)?,
        })
    }
}

/// Rotation direction, serialized as `-1` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.sign())
    }
}

impl FromKson for Direction {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        match as_int(value) {
            Some(-1) => Ok(Self::Left),
            Some(1) => Ok(Self::Right),
            _ => Err(path.mismatch("-1 or 1")),
        }
    }
}

/// `[y, direction, length]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CamPatternInvokeSpin {
    pub y: Pulse,
    pub direction: Direction,
    pub length: Pulse,
}

impl FromKson for CamPatternInvokeSpin {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, 3, 3)?;
        Ok(Self {
            y: element(items, 0, path)?,
            direction: element(items, 1, path)?,
            length: element(items, 2, path)?,
        })
    }
}

impl Serialize for CamPatternInvokeSpin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.y, self.direction, self.length).serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CamPatternInvokeSwingValue {
    pub scale: f64,
    pub repeat: u64,
    pub decay_order: u64,
}

impl Default for CamPatternInvokeSwingValue {
    fn default() -> Self {
        Self {
            scale: 1.0,
            repeat: 1,
            decay_order: 0,
        }
    }
}

impl FromKson for CamPatternInvokeSwingValue {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            scale: obj.or_else("scale", || 1.0)?,
            repeat: obj.or_else("repeat", || 1)?,
            decay_order: obj.or_default("decay_order")?,
        })
    }
}

/// `[y, direction, length, v?]`
#[derive(Debug, Clone, PartialEq)]
pub struct CamPatternInvokeSwing {
    pub y: Pulse,
    pub direction: Direction,
    pub length: Pulse,
    pub v: Option<CamPatternInvokeSwingValue>,
}

impl FromKson for CamPatternInvokeSwing {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, 3, 4)?;
        Ok(Self {
            y: element(items, 0, path)?,
            direction: element(items, 1, path)?,
            length: element(items, 2, path)?,
            v: optional_element(items, 3, path)?,
        })
    }
}

impl Serialize for CamPatternInvokeSwing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_tuple(if self.v.is_some() { 4 } else { 3 })?;
        seq.serialize_element(&self.y)?;
        seq.serialize_element(&self.direction)?;
        seq.serialize_element(&self.length)?;
        if let Some(v) = &self.v {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}

/// Camera patterns triggered by laser slams
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CamPatternLaserInvokeList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<Vec<CamPatternInvokeSpin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_spin: Option<Vec<CamPatternInvokeSpin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing: Option<Vec<CamPatternInvokeSwing>>,
}

impl FromKson for CamPatternLaserInvokeList {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            spin: obj.optional("spin")?,
            half_spin: obj.optional("half_spin")?,
            swing: obj.optional("swing")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CamPatternLaserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_event: Option<CamPatternLaserInvokeList>,
}

impl FromKson for CamPatternLaserInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            slam_event: obj.optional("slam_event")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CamPatternInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laser: Option<CamPatternLaserInfo>,
}

impl FromKson for CamPatternInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            laser: obj.optional("laser")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CamGraphs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<Vec<GraphPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_x: Option<Vec<GraphPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_x: Option<Vec<GraphPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_z: Option<Vec<GraphPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_split: Option<Vec<GraphPoint>>,
}

impl FromKson for CamGraphs {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            zoom: obj.optional("zoom")?,
            shift_x: obj.optional("shift_x")?,
            rotation_x: obj.optional("rotation_x")?,
            rotation_z: obj.optional("rotation_z")?,
            center_split: obj.optional("center_split")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CamInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<CamGraphs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<CamPatternInfo>,
}

impl FromKson for CamInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            body: obj.optional("body")?,
            pattern: obj.optional("pattern")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<TiltInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam: Option<CamInfo>,
}

impl FromKson for CameraInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            tilt: obj.optional("tilt")?,
            cam: obj.optional("cam")?,
        })
    }
}

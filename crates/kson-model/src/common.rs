use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, element, optional_element, tuple};

/// Time position in pulses. A whole note is [`PULSES_PER_WHOLE`] pulses.
pub type Pulse = u64;

pub const PULSES_PER_WHOLE: Pulse = 960;

/// `[pulse, value]` pair used by every pulse-indexed timeline.
pub type ByPulse<T> = (Pulse, T);

/// `[measure_index, value]` pair.
pub type ByMeasureIdx<T> = (u64, T);

/// `[v, vf]`: value on arrival and value on departure of a graph point.
///
/// A bare number in the source document is promoted to `[v, v]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GraphValue(pub f64, pub f64);

impl GraphValue {
    pub fn flat(v: f64) -> Self {
        Self(v, v)
    }

    pub fn is_flat(&self) -> bool {
        self.0 == self.1
    }
}

impl FromKson for GraphValue {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        if value.is_number() {
            return f64::from_kson(value, path).map(Self::flat);
        }
        let (v, vf) = <(f64, f64)>::from_kson(value, path)?;
        Ok(Self(v, vf))
    }
}

/// `[a, b]` curve shape of the segment leaving a graph point. `[0, 0]` is linear.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct GraphCurveValue(pub f64, pub f64);

impl GraphCurveValue {
    pub fn is_linear(&self) -> bool {
        self.0 == 0.0 && self.1 == 0.0
    }
}

impl FromKson for GraphCurveValue {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let (a, b) = <(f64, f64)>::from_kson(value, path)?;
        Ok(Self(a, b))
    }
}

/// `[ry, v, curve?]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPoint {
    pub ry: Pulse,
    pub v: GraphValue,
    pub curve: GraphCurveValue,
}

impl GraphPoint {
    pub fn new(ry: Pulse, v: GraphValue) -> Self {
        Self {
            ry,
            v,
            curve: GraphCurveValue::default(),
        }
    }
}

impl FromKson for GraphPoint {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, 2, 3)?;
        Ok(Self {
            ry: element(items, 0, path)?,
            v: element(items, 1, path)?,
            curve: optional_element(items, 2, path)?.unwrap_or_default(),
        })
    }
}

impl Serialize for GraphPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let linear = self.curve.is_linear();
        let mut seq = serializer.serialize_tuple(if linear { 2 } else { 3 })?;
        seq.serialize_element(&self.ry)?;
        seq.serialize_element(&self.v)?;
        if !linear {
            seq.serialize_element(&self.curve)?;
        }
        seq.end()
    }
}

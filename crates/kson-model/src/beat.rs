use serde::Serialize;
use serde_json::Value;

use crate::common::{ByMeasureIdx, ByPulse, GraphPoint, GraphValue};
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

/// `[numerator, denominator]`, both positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSig(pub u32, pub u32);

impl TimeSig {
    pub fn numerator(&self) -> u32 {
        self.0
    }

    pub fn denominator(&self) -> u32 {
        self.1
    }
}

impl Default for TimeSig {
    fn default() -> Self {
        Self(4, 4)
    }
}

impl FromKson for TimeSig {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let (n, d) = <(u32, u32)>::from_kson(value, path)?;
        if n == 0 || d == 0 {
            return Err(path.mismatch("a time signature with positive parts"));
        }
        Ok(Self(n, d))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatInfo {
    pub bpm: Vec<ByPulse<f64>>,
    pub time_sig: Vec<ByMeasureIdx<TimeSig>>,
    pub scroll_speed: Vec<GraphPoint>,
}

pub fn default_time_sig() -> Vec<ByMeasureIdx<TimeSig>> {
    vec![(0, TimeSig::default())]
}

pub fn default_scroll_speed() -> Vec<GraphPoint> {
    vec![GraphPoint::new(0, GraphValue::flat(1.0))]
}

impl Default for BeatInfo {
    fn default() -> Self {
        Self {
            bpm: vec![(0, 120.0)],
            time_sig: default_time_sig(),
            scroll_speed: default_scroll_speed(),
        }
    }
}

impl FromKson for BeatInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            bpm: obj.required("bpm")?,
            time_sig: obj.or_else("time_sig", default_time_sig)?,
            scroll_speed: obj.or_else("scroll_speed", default_scroll_speed)?,
        })
    }
}

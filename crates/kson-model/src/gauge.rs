use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GaugeInfo {
    /// Total gauge gain in percent, 0 for automatic
    pub total: u64,
}

impl FromKson for GaugeInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            total: obj.or_default("total")?,
        })
    }
}

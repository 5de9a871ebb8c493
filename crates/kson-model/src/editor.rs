use serde::Serialize;
use serde_json::Value;

use crate::common::ByPulse;
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Vec<ByPulse<String>>>,
}

impl FromKson for EditorInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            app_name: obj.optional("app_name")?,
            app_version: obj.optional("app_version")?,
            comment: obj.optional("comment")?,
        })
    }
}

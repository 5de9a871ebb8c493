use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::common::ByPulse;
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

/// Legacy data the converter did not interpret, kept for lossless round trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KshUnknownInfo {
    /// Unrecognized header options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, String>>,
    /// Unrecognized options by key, at the pulse they appeared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<BTreeMap<String, Vec<ByPulse<String>>>>,
    /// Unrecognized lines at the pulse they appeared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<ByPulse<String>>>,
}

impl FromKson for KshUnknownInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            meta: obj.optional("meta")?,
            option: obj.optional("option")?,
            line: obj.optional("line")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompatInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ksh_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ksh_unknown: Option<KshUnknownInfo>,
}

impl FromKson for CompatInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            ksh_version: obj.optional("ksh_version")?,
            ksh_unknown: obj.optional("ksh_unknown")?,
        })
    }
}

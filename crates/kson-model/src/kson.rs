use serde::Serialize;
use serde_json::{Map, Value};

use crate::audio::AudioInfo;
use crate::beat::BeatInfo;
use crate::bg::BgInfo;
use crate::camera::CameraInfo;
use crate::compat::CompatInfo;
use crate::editor::EditorInfo;
use crate::error::SchemaError;
use crate::gauge::GaugeInfo;
use crate::meta::MetaInfo;
use crate::note::NoteInfo;
use crate::schema::{FieldPath, FromKson, ObjectReader};

pub const KSON_VERSION: &str = "0.8.0";

/// Root of a KSON chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kson {
    pub version: String,
    pub meta: MetaInfo,
    pub beat: BeatInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<GaugeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<BgInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<EditorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compat: Option<CompatInfo>,
    /// Implementation-defined data, passed through untouched
    #[serde(rename = "impl", skip_serializing_if = "Option::is_none")]
    pub impl_info: Option<Map<String, Value>>,
    pub note: NoteInfo,
}

impl Default for Kson {
    fn default() -> Self {
        Self {
            version: KSON_VERSION.to_string(),
            meta: MetaInfo::default(),
            beat: BeatInfo::default(),
            gauge: None,
            audio: None,
            camera: None,
            bg: None,
            editor: None,
            compat: None,
            impl_info: None,
            note: NoteInfo::default(),
        }
    }
}

impl FromKson for Kson {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            version: obj.required("version")?,
            meta: obj.required("meta")?,
            beat: obj.required("beat")?,
            gauge: obj.optional("gauge")?,
            audio: obj.optional("audio")?,
            camera: obj.optional("camera")?,
            bg: obj.optional("bg")?,
            editor: obj.optional("editor")?,
            compat: obj.optional("compat")?,
            impl_info: obj.optional("impl")?,
            note: obj.or_default("note")?,
        })
    }
}

impl Kson {
    /// Validate a JSON value, filling defaults for absent optional fields.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Self::from_kson(value, FieldPath::root())
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn to_value(&self) -> Result<Value, SchemaError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Re-run validation on this value's own serialization.
    pub fn validate(&self) -> Result<(), SchemaError> {
        Self::from_value(&self.to_value()?).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_round_trip() {
        let kson = Kson::default();
        let value = kson.to_value().unwrap();
        assert_eq!(value["version"], "0.8.0");
        assert!(value.get("gauge").is_none());
        assert_eq!(Kson::from_value(&value).unwrap(), kson);
    }

    #[test]
    fn test_impl_is_opaque() {
        let value = json!({
            "version": "0.8.0",
            "meta": { "title": "", "artist": "", "chart_author": "", "difficulty": 0, "level": 1, "disp_bpm": "120" },
            "beat": { "bpm": [[0, 120]] },
            "impl": { "anything": [1, "two", null] },
        });
        let kson = Kson::from_value(&value).unwrap();
        assert_eq!(kson.impl_info.unwrap()["anything"], json!([1, "two", null]));
    }

    #[test]
    fn test_impl_must_be_object() {
        let value = json!({
            "version": "0.8.0",
            "meta": { "title": "", "artist": "", "chart_author": "", "difficulty": 0, "level": 1, "disp_bpm": "120" },
            "beat": { "bpm": [[0, 120]] },
            "impl": [],
        });
        let err = Kson::from_value(&value).unwrap_err();
        assert_eq!(err.to_string(), "impl: expected an object");
    }

    #[test]
    fn test_invalid_json_text() {
        let err = Kson::from_json_str("{").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
        assert_eq!(err.path(), None);
    }
}

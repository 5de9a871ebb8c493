use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader, as_uint};

/// Difficulty slot. Known slots are stored by index, custom names as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Difficulty {
    Index(u32),
    Name(String),
}

impl Difficulty {
    pub const LIGHT: Difficulty = Difficulty::Index(0);
    pub const CHALLENGE: Difficulty = Difficulty::Index(1);
    pub const EXTENDED: Difficulty = Difficulty::Index(2);
    pub const INFINITE: Difficulty = Difficulty::Index(3);
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::LIGHT
    }
}

impl FromKson for Difficulty {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        if let Some(s) = value.as_str() {
            return Ok(Self::Name(s.to_string()));
        }
        as_uint(value)
            .and_then(|n| u32::try_from(n).ok())
            .map(Self::Index)
            .ok_or_else(|| path.mismatch("a non-negative integer or a string"))
    }
}

/// Chart metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaInfo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_translit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_img_filename: Option<String>,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_translit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_img_filename: Option<String>,
    pub chart_author: String,
    pub difficulty: Difficulty,
    pub level: u32,
    /// Displayed tempo, free text such as `"120-180"`
    pub disp_bpm: String,
    /// Tempo used as the hi-speed reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_bpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jacket_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jacket_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

impl Default for MetaInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_translit: None,
            title_img_filename: None,
            artist: String::new(),
            artist_translit: None,
            artist_img_filename: None,
            chart_author: String::new(),
            difficulty: Difficulty::default(),
            level: 1,
            disp_bpm: "120".to_string(),
            std_bpm: None,
            jacket_filename: None,
            jacket_author: None,
            icon_filename: None,
            information: None,
        }
    }
}

impl FromKson for MetaInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            title: obj.required("title")?,
            title_translit: obj.optional("title_translit")?,
            title_img_filename: obj.optional("title_img_filename")?,
            artist: obj.required("artist")?,
            artist_translit: obj.optional("artist_translit")?,
            artist_img_filename: obj.optional("artist_img_filename")?,
            chart_author: obj.required("chart_author")?,
            difficulty: obj.required("difficulty")?,
            level: obj.required("level")?,
            disp_bpm: obj.required("disp_bpm")?,
            std_bpm: obj.optional("std_bpm")?,
            jacket_filename: obj.optional("jacket_filename")?,
            jacket_author: obj.optional("jacket_author")?,
            icon_filename: obj.optional("icon_filename")?,
            information: obj.optional("information")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "title": "t",
            "artist": "a",
            "chart_author": "c",
            "difficulty": 2,
            "level": 15,
            "disp_bpm": "150",
        })
    }

    #[test]
    fn test_minimal_meta() {
        let meta = MetaInfo::from_kson(&minimal(), FieldPath::root()).unwrap();
        assert_eq!(meta.difficulty, Difficulty::EXTENDED);
        assert_eq!(meta.level, 15);
        assert_eq!(meta.std_bpm, None);
    }

    #[test]
    fn test_difficulty_name() {
        let mut value = minimal();
        value["difficulty"] = json!("custom");
        let meta = MetaInfo::from_kson(&value, FieldPath::root()).unwrap();
        assert_eq!(meta.difficulty, Difficulty::Name("custom".to_string()));
    }

    #[test]
    fn test_rejects_negative_level() {
        let mut value = minimal();
        value["level"] = json!(-1);
        let err = MetaInfo::from_kson(&value, FieldPath::root()).unwrap_err();
        assert_eq!(err.path(), Some("level"));
    }

    #[test]
    fn test_rejects_missing_title() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("title");
        let err = MetaInfo::from_kson(&value, FieldPath::root()).unwrap_err();
        assert_eq!(err.to_string(), "title: missing required field");
    }

    #[test]
    fn test_optional_fields_skipped_when_absent() {
        let meta = MetaInfo::default();
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "",
                "artist": "",
                "chart_author": "",
                "difficulty": 0,
                "level": 1,
                "disp_bpm": "120",
            })
        );
    }
}

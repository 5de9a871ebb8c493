use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KshBgInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl FromKson for KshBgInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            filename: obj.optional("filename")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KshLayerRotationInfo {
    pub tilt: bool,
    pub spin: bool,
}

impl Default for KshLayerRotationInfo {
    fn default() -> Self {
        Self {
            tilt: true,
            spin: true,
        }
    }
}

impl FromKson for KshLayerRotationInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            tilt: obj.or_else("tilt", || true)?,
            spin: obj.or_else("spin", || true)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KshLayerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Loop length in milliseconds, negative plays in reverse
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<KshLayerRotationInfo>,
}

impl FromKson for KshLayerInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            filename: obj.optional("filename")?,
            duration: obj.or_default("duration")?,
            rotation: obj.optional("rotation")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KshMovieInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub offset: i64,
}

impl FromKson for KshMovieInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            filename: obj.optional("filename")?,
            offset: obj.or_default("offset")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyBgInfo {
    /// `[default]` or `[default, shown when the gauge is at least 70%]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<Vec<KshBgInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<KshLayerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<KshMovieInfo>,
}

impl FromKson for LegacyBgInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        let bg: Option<Vec<KshBgInfo>> = obj.optional("bg")?;
        if let Some(bg) = &bg
            && !(1..=2).contains(&bg.len())
        {
            return Err(path.key("bg").mismatch("an array of 1 to 2 elements"));
        }
        Ok(Self {
            bg,
            layer: obj.optional("layer")?,
            movie: obj.optional("movie")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BgInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyBgInfo>,
}

impl FromKson for BgInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            filename: obj.optional("filename")?,
            offset: obj.or_default("offset")?,
            legacy: obj.optional("legacy")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_bg() {
        let bg = BgInfo::from_kson(
            &json!({ "legacy": {
                "bg": [{ "filename": "desert" }, { "filename": "night" }],
                "layer": { "filename": "arrow", "rotation": { "spin": false } },
                "movie": { "filename": "bga.mp4", "offset": -500 },
            } }),
            FieldPath::root(),
        )
        .unwrap();
        let legacy = bg.legacy.unwrap();
        assert_eq!(legacy.bg.unwrap().len(), 2);
        let layer = legacy.layer.unwrap();
        assert_eq!(layer.duration, 0);
        assert_eq!(
            layer.rotation,
            Some(KshLayerRotationInfo {
                tilt: true,
                spin: false
            })
        );
        assert_eq!(legacy.movie.unwrap().offset, -500);
    }

    #[test]
    fn test_bg_list_length() {
        let err = BgInfo::from_kson(&json!({ "legacy": { "bg": [] } }), FieldPath::root())
            .unwrap_err();
        assert_eq!(err.to_string(), "legacy.bg: expected an array of 1 to 2 elements");
    }
}

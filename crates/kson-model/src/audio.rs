// Audio section: BGM, key sounds, and audio effects

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::common::{ByPulse, Pulse};
use crate::error::SchemaError;
use crate::schema::{FieldPath, FromKson, ObjectReader};

/// `[name, value]`, used where definition order matters.
pub type DefKeyValuePair<T> = (String, T);

/// Parameter changes by parameter name: `[[pulse, value], ...]`.
pub type ParamChange = BTreeMap<String, Vec<ByPulse<String>>>;

/// A lane pair of events, `[left, right]`.
pub type LanePair<T> = [Vec<T>; 2];

// BGM

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BgmPreviewInfo {
    pub offset: u64,
    pub duration: u64,
}

impl Default for BgmPreviewInfo {
    fn default() -> Self {
        Self {
            offset: 0,
            duration: 15000,
        }
    }
}

impl FromKson for BgmPreviewInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        let default = Self::default();
        Ok(Self {
            offset: obj.or_else("offset", || default.offset)?,
            duration: obj.or_else("duration", || default.duration)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegacyBgmInfo {
    /// Music files switched by effects: `[default, fx, laser, fx+laser]`
    pub fp_filenames: Vec<String>,
}

impl FromKson for LegacyBgmInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            fp_filenames: obj.required("fp_filenames")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BgmInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub vol: f64,
    /// Offset in milliseconds
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<BgmPreviewInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<LegacyBgmInfo>,
}

impl Default for BgmInfo {
    fn default() -> Self {
        Self {
            filename: None,
            vol: 1.0,
            offset: 0,
            preview: None,
            legacy: None,
        }
    }
}

impl FromKson for BgmInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            filename: obj.optional("filename")?,
            vol: obj.or_else("vol", || 1.0)?,
            offset: obj.or_default("offset")?,
            preview: obj.optional("preview")?,
            legacy: obj.optional("legacy")?,
        })
    }
}

// Key sound

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySoundInvokeFx {
    pub vol: f64,
}

impl Default for KeySoundInvokeFx {
    fn default() -> Self {
        Self { vol: 1.0 }
    }
}

impl FromKson for KeySoundInvokeFx {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            vol: obj.or_else("vol", || 1.0)?,
        })
    }
}

/// FX chip key sound: `y` or `[y, {vol}]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FxChipEvent {
    At(Pulse),
    WithParams(Pulse, KeySoundInvokeFx),
}

impl FxChipEvent {
    pub fn y(&self) -> Pulse {
        match *self {
            Self::At(y) | Self::WithParams(y, _) => y,
        }
    }
}

impl FromKson for FxChipEvent {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        if value.is_array() {
            let (y, params) = <(Pulse, KeySoundInvokeFx)>::from_kson(value, path)?;
            Ok(Self::WithParams(y, params))
        } else {
            Pulse::from_kson(value, path).map(Self::At)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeySoundFxInfo {
    /// Key sound filename to per-lane chip events
    pub chip_event: BTreeMap<String, LanePair<FxChipEvent>>,
}

impl FromKson for KeySoundFxInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            chip_event: obj.required("chip_event")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeySoundInvokeListLaser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_up: Option<Vec<Pulse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_down: Option<Vec<Pulse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_swing: Option<Vec<Pulse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_mute: Option<Vec<Pulse>>,
}

impl FromKson for KeySoundInvokeListLaser {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            slam_up: obj.optional("slam_up")?,
            slam_down: obj.optional("slam_down")?,
            slam_swing: obj.optional("slam_swing")?,
            slam_mute: obj.optional("slam_mute")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeySoundLaserLegacyInfo {
    /// Scale slam volume with laser width
    pub vol_auto: bool,
}

impl FromKson for KeySoundLaserLegacyInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            vol_auto: obj.or_default("vol_auto")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySoundLaserInfo {
    pub vol: Vec<ByPulse<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slam_event: Option<KeySoundInvokeListLaser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy: Option<KeySoundLaserLegacyInfo>,
}

fn default_laser_vol() -> Vec<ByPulse<f64>> {
    vec![(0, 0.5)]
}

impl Default for KeySoundLaserInfo {
    fn default() -> Self {
        Self {
            vol: default_laser_vol(),
            slam_event: None,
            legacy: None,
        }
    }
}

impl FromKson for KeySoundLaserInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            vol: obj.or_else("vol", default_laser_vol)?,
            slam_event: obj.optional("slam_event")?,
            legacy: obj.optional("legacy")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeySoundInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<KeySoundFxInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laser: Option<KeySoundLaserInfo>,
}

impl FromKson for KeySoundInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            fx: obj.optional("fx")?,
            laser: obj.optional("laser")?,
        })
    }
}

// Audio effect

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioEffectDef {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<BTreeMap<String, String>>,
}

impl AudioEffectDef {
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            v: None,
        }
    }
}

impl FromKson for AudioEffectDef {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            effect_type: obj.required("type")?,
            v: obj.optional("v")?,
        })
    }
}

/// FX long note effect invocation: `y` or `[y, {param: value}]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FxLongEvent {
    At(Pulse),
    WithParams(Pulse, BTreeMap<String, String>),
}

impl FxLongEvent {
    pub fn y(&self) -> Pulse {
        match *self {
            Self::At(y) | Self::WithParams(y, _) => y,
        }
    }
}

impl FromKson for FxLongEvent {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        if value.is_array() {
            let (y, params) = <(Pulse, BTreeMap<String, String>)>::from_kson(value, path)?;
            Ok(Self::WithParams(y, params))
        } else {
            Pulse::from_kson(value, path).map(Self::At)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioEffectFxInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<Vec<DefKeyValuePair<AudioEffectDef>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_change: Option<BTreeMap<String, ParamChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_event: Option<BTreeMap<String, LanePair<FxLongEvent>>>,
}

impl FromKson for AudioEffectFxInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            def: obj.optional("def")?,
            param_change: obj.optional("param_change")?,
            long_event: obj.optional("long_event")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioEffectLaserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<BTreeMap<String, AudioEffectDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_change: Option<BTreeMap<String, ParamChange>>,
    /// Effect switches, by effect name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_event: Option<BTreeMap<String, Vec<Pulse>>>,
    /// Milliseconds
    pub peaking_filter_delay: u64,
}

impl FromKson for AudioEffectLaserInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            def: obj.optional("def")?,
            param_change: obj.optional("param_change")?,
            pulse_event: obj.optional("pulse_event")?,
            peaking_filter_delay: obj.or_default("peaking_filter_delay")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioEffectInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<AudioEffectFxInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laser: Option<AudioEffectLaserInfo>,
}

impl FromKson for AudioEffectInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            fx: obj.optional("fx")?,
            laser: obj.optional("laser")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgm: Option<BgmInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_sound: Option<KeySoundInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_effect: Option<AudioEffectInfo>,
}

impl FromKson for AudioInfo {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let obj = ObjectReader::new(value, path)?;
        Ok(Self {
            bgm: obj.optional("bgm")?,
            key_sound: obj.optional("key_sound")?,
            audio_effect: obj.optional("audio_effect")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<AudioInfo, SchemaError> {
        AudioInfo::from_kson(&value, FieldPath::root())
    }

    #[test]
    fn test_bgm_defaults() {
        let audio = parse(json!({ "bgm": { "filename": "song.ogg", "preview": {} } })).unwrap();
        let bgm = audio.bgm.unwrap();
        assert_eq!(bgm.filename.as_deref(), Some("song.ogg"));
        assert_eq!(bgm.vol, 1.0);
        assert_eq!(bgm.offset, 0);
        assert_eq!(bgm.preview, Some(BgmPreviewInfo { offset: 0, duration: 15000 }));
        assert_eq!(bgm.legacy, None);
    }

    #[test]
    fn test_negative_bgm_offset_allowed() {
        let audio = parse(json!({ "bgm": { "offset": -120 } })).unwrap();
        assert_eq!(audio.bgm.unwrap().offset, -120);
    }

    #[test]
    fn test_legacy_bgm_requires_filenames() {
        let err = parse(json!({ "bgm": { "legacy": {} } })).unwrap_err();
        assert_eq!(err.to_string(), "bgm.legacy.fp_filenames: missing required field");
    }

    #[test]
    fn test_key_sound_laser_defaults() {
        let audio = parse(json!({ "key_sound": { "laser": { "legacy": {} } } })).unwrap();
        let laser = audio.key_sound.unwrap().laser.unwrap();
        assert_eq!(laser.vol, vec![(0, 0.5)]);
        assert_eq!(laser.legacy, Some(KeySoundLaserLegacyInfo { vol_auto: false }));
    }

    #[test]
    fn test_fx_chip_events() {
        let audio = parse(json!({
            "key_sound": { "fx": { "chip_event": {
                "clap.wav": [[0, [480, { "vol": 0.5 }]], [[960, {}]]]
            } } }
        }))
        .unwrap();
        let fx = audio.key_sound.unwrap().fx.unwrap();
        let lanes = &fx.chip_event["clap.wav"];
        assert_eq!(lanes[0][0], FxChipEvent::At(0));
        assert_eq!(
            lanes[0][1],
            FxChipEvent::WithParams(480, KeySoundInvokeFx { vol: 0.5 })
        );
        assert_eq!(lanes[1][0], FxChipEvent::WithParams(960, KeySoundInvokeFx::default()));
    }

    #[test]
    fn test_audio_effects() {
        let audio = parse(json!({
            "audio_effect": {
                "fx": {
                    "def": [["re", { "type": "Retrigger", "v": { "update_period": "1/8" } }]],
                    "long_event": { "Retrigger": [[0, [240, { "param1": "8" }]], []] },
                },
                "laser": {
                    "pulse_event": { "peaking_filter": [0, 960] },
                    "param_change": { "peaking_filter": { "gain": [[0, "50%"]] } },
                },
            }
        }))
        .unwrap();
        let effect = audio.audio_effect.unwrap();
        let fx = effect.fx.unwrap();
        assert_eq!(fx.def.unwrap()[0].1.effect_type, "Retrigger");
        let long = &fx.long_event.unwrap()["Retrigger"];
        assert_eq!(long[0][0], FxLongEvent::At(0));
        assert_eq!(long[0][1].y(), 240);

        let laser = effect.laser.unwrap();
        assert_eq!(laser.peaking_filter_delay, 0);
        assert_eq!(laser.pulse_event.unwrap()["peaking_filter"], vec![0, 960]);
    }

    #[test]
    fn test_effect_def_requires_type() {
        let err = parse(json!({ "audio_effect": { "laser": { "def": { "x": {} } } } })).unwrap_err();
        assert_eq!(err.to_string(), "audio_effect.laser.def.x.type: missing required field");
    }
}

// Audio effects: laser filters, FX definitions and FX invocations

use std::collections::BTreeMap;

use kson_model::Pulse;
use kson_model::audio::{AudioEffectDef, FxChipEvent, FxLongEvent, KeySoundInvokeFx};

use crate::ast::Definition;

use super::builder::{KsonBuilder, upsert_at};
use super::parse_leading_or;

const SWITCH_AUDIO: &str = "switch_audio";

/// Map a KSH `filtertype` to a laser effect name.
///
/// `fx` and `fx;bitc` switch to the auxiliary music file when the chart has
/// one; the effect definition for it is created on first use.
pub(crate) fn resolve_filter_name(builder: &mut KsonBuilder, name: &str) -> String {
    let fallback = match name {
        "peak" => return "peaking_filter".to_string(),
        "hpf1" => return "high_pass_filter".to_string(),
        "lpf1" => return "low_pass_filter".to_string(),
        "bitc" => return "bitcrusher".to_string(),
        "fx" => "peaking_filter",
        "fx;bitc" => "bitcrusher",
        user_defined => return user_defined.to_string(),
    };

    let Some(filename) = builder.aux_music_filename().map(str::to_string) else {
        return fallback.to_string();
    };
    builder
        .audio_effect_laser()
        .def
        .get_or_insert_with(BTreeMap::new)
        .entry(SWITCH_AUDIO.to_string())
        .or_insert_with(|| {
            let mut def = AudioEffectDef::new("SwitchAudio");
            def.v = Some(BTreeMap::from([("filename".to_string(), filename)]));
            def
        });
    SWITCH_AUDIO.to_string()
}

pub(crate) fn add_filter_event(builder: &mut KsonBuilder, pulse: Pulse, name: &str) {
    let resolved = resolve_filter_name(builder, name);
    let events = builder
        .audio_effect_laser()
        .pulse_event
        .get_or_insert_with(BTreeMap::new)
        .entry(resolved)
        .or_default();
    if events.last() != Some(&pulse) {
        events.push(pulse);
    }
}

pub(crate) fn add_peaking_filter_gain(builder: &mut KsonBuilder, pulse: Pulse, percent: i64) {
    let gain = builder
        .audio_effect_laser()
        .param_change
        .get_or_insert_with(BTreeMap::new)
        .entry("peaking_filter".to_string())
        .or_default()
        .entry("gain".to_string())
        .or_default();
    upsert_at(gain, pulse, format!("{percent}%"));
}

/// `#define_fx` and `#define_filter` lines. Anything else is kept verbatim.
pub(crate) fn convert_definitions(definitions: &[Definition], builder: &mut KsonBuilder) {
    for definition in definitions {
        let parsed = parse_effect_def(&definition.value);
        match (definition.kind.as_str(), parsed) {
            ("fx", Some(def)) => builder
                .audio_effect_fx()
                .def
                .get_or_insert_with(Vec::new)
                .push((definition.name.clone(), def)),
            ("filter", Some(def)) => {
                builder
                    .audio_effect_laser()
                    .def
                    .get_or_insert_with(BTreeMap::new)
                    .insert(definition.name.clone(), def);
            }
            _ => builder.unknown_lines().push((0, definition.to_string())),
        }
    }
}

/// `type=Name;param=value;...`
fn parse_effect_def(value: &str) -> Option<AudioEffectDef> {
    let mut effect_type = None;
    let mut params = BTreeMap::new();
    for part in value.split(';').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=')?;
        if key == "type" {
            effect_type = Some(value);
        } else {
            params.insert(key.to_string(), value.to_string());
        }
    }

    let mut def = AudioEffectDef::new(effect_type?);
    if !params.is_empty() {
        def.v = Some(params);
    }
    Some(def)
}

/// Effect attached to an FX long note: `Name;param1;param2;...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FxInvocation {
    pub name: String,
    pub params: Vec<String>,
}

impl FxInvocation {
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let name = parts.next().filter(|name| !name.is_empty())?;
        Some(Self {
            name: name.to_string(),
            params: parts.map(str::to_string).collect(),
        })
    }

    pub fn override_param1(&mut self, value: String) {
        match self.params.first_mut() {
            Some(param1) => *param1 = value,
            None => self.params.push(value),
        }
    }

    fn to_event(&self, pulse: Pulse) -> FxLongEvent {
        if self.params.is_empty() {
            return FxLongEvent::At(pulse);
        }
        let params = self
            .params
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("param{}", i + 1), v.clone()))
            .collect();
        FxLongEvent::WithParams(pulse, params)
    }
}

pub(crate) fn add_fx_long_event(
    builder: &mut KsonBuilder,
    lane: usize,
    pulse: Pulse,
    invocation: &FxInvocation,
) {
    let events = builder
        .audio_effect_fx()
        .long_event
        .get_or_insert_with(BTreeMap::new)
        .entry(invocation.name.clone())
        .or_default();
    events[lane].push(invocation.to_event(pulse));
}

/// Key sound for an FX chip: `file;vol` with the volume in percent.
pub(crate) fn add_fx_chip_sound(builder: &mut KsonBuilder, lane: usize, pulse: Pulse, value: &str) {
    let (filename, vol) = match value.split_once(';') {
        Some((filename, vol)) => (filename, Some(vol)),
        None => (value, None),
    };
    if filename.is_empty() {
        return;
    }

    let event = match vol {
        Some(vol) => {
            let percent = parse_leading_or("fx_se", vol, 100);
            FxChipEvent::WithParams(
                pulse,
                KeySoundInvokeFx {
                    vol: percent as f64 / 100.0,
                },
            )
        }
        None => FxChipEvent::At(pulse),
    };
    builder
        .key_sound_fx()
        .chip_event
        .entry(filename.to_string())
        .or_default()[lane]
        .push(event);
}

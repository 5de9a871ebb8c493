use kson_model::bg::{KshBgInfo, KshLayerRotationInfo};
use kson_model::{Difficulty, TimeSig};

use crate::ast::{Ksh, Line};
use crate::config::ConverterConfig;
use crate::error::KshError;
use crate::pulse::parse_time_sig;

use super::builder::KsonBuilder;
use super::{DEFAULT_BPM, effect, parse_finite_or, parse_leading_or, parse_or};

/// Timing state the body pass starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeaderState {
    pub initial_bpm: f64,
    pub initial_time_sig: TimeSig,
}

pub(crate) fn convert_header(
    ksh: &Ksh,
    config: &ConverterConfig,
    builder: &mut KsonBuilder,
) -> Result<HeaderState, KshError> {
    let has_version = ksh.header_options().any(|(key, _)| key == "ver");
    let volume_scale = config.bgm_volume_scale(has_version);

    let mut state = HeaderState {
        initial_bpm: DEFAULT_BPM,
        initial_time_sig: TimeSig::default(),
    };
    let mut filter_type = None;

    for line in &ksh.header {
        let Line::Option { key, value } = line else {
            builder.unknown_lines().push((0, line.to_string()));
            continue;
        };
        let value = value.as_str();

        match key.as_str() {
            "title" => builder.meta.title = value.to_string(),
            "title_img" => builder.meta.title_img_filename = Some(value.to_string()),
            "artist" => builder.meta.artist = value.to_string(),
            "artist_img" => builder.meta.artist_img_filename = Some(value.to_string()),
            "effect" => builder.meta.chart_author = value.to_string(),
            "jacket" => builder.meta.jacket_filename = Some(value.to_string()),
            "illustrator" => builder.meta.jacket_author = Some(value.to_string()),
            "difficulty" => builder.meta.difficulty = parse_difficulty(value),
            "level" => builder.meta.level = parse_or(key, value, 1),
            "information" => builder.meta.information = Some(value.to_string()),
            "t" => {
                builder.meta.disp_bpm = value.to_string();
                if !value.contains('-') {
                    state.initial_bpm = parse_finite_or(key, value, DEFAULT_BPM);
                }
            }
            // 0 means "pick automatically"
            "to" => builder.meta.std_bpm = Some(parse_finite_or(key, value, 0.0)),
            "beat" => {
                state.initial_time_sig =
                    parse_time_sig(value).ok_or_else(|| KshError::HeaderTimeSignature {
                        value: value.to_string(),
                    })?;
            }
            "total" => builder.gauge().total = parse_or(key, value, 0),
            "m" => {
                let files: Vec<String> = value.split(';').map(str::to_string).collect();
                let bgm = builder.bgm();
                bgm.filename = files.first().cloned();
                if files.len() > 1 {
                    builder.bgm_legacy().fp_filenames = files;
                }
            }
            "mvol" => {
                let percent = parse_leading_or(key, value, 100);
                builder.bgm().vol = percent as f64 / 100.0 * volume_scale;
            }
            "o" => builder.bgm().offset = parse_or(key, value, 0),
            "po" => builder.bgm_preview().offset = parse_or(key, value, 0),
            "plength" => builder.bgm_preview().duration = parse_or(key, value, 15000),
            "chokkakuvol" => {
                let percent = parse_leading_or(key, value, 50);
                builder.key_sound_laser().vol = vec![(0, percent as f64 / 100.0)];
            }
            "chokkakuautovol" => builder.key_sound_laser_legacy().vol_auto = value == "1",
            "pfilterdelay" => {
                builder.audio_effect_laser().peaking_filter_delay = parse_or(key, value, 40)
            }
            // Resolved once `m` is known
            "filtertype" => filter_type = Some(value),
            "pfiltergain" => effect::add_peaking_filter_gain(builder, 0, parse_or(key, value, 50)),
            "bg" => {
                let files: Vec<&str> = value.split(';').collect();
                if files.len() <= 2 {
                    builder.bg_legacy().bg = Some(
                        files
                            .into_iter()
                            .map(|f| KshBgInfo {
                                filename: Some(f.to_string()),
                            })
                            .collect(),
                    );
                } else {
                    add_unknown_meta(builder, key, value);
                }
            }
            "layer" => convert_layer(builder, value),
            "v" => builder.bg_movie().filename = Some(value.to_string()),
            "vo" => builder.bg_movie().offset = parse_or(key, value, 0),
            "ver" => builder.compat().ksh_version = Some(value.to_string()),
            _ => add_unknown_meta(builder, key, value),
        }
    }

    if let Some(name) = filter_type {
        effect::add_filter_event(builder, 0, name);
    }

    Ok(state)
}

fn parse_difficulty(value: &str) -> Difficulty {
    match value {
        "light" => Difficulty::LIGHT,
        "challenge" => Difficulty::CHALLENGE,
        "extended" => Difficulty::EXTENDED,
        "infinite" => Difficulty::INFINITE,
        other => Difficulty::Name(other.to_string()),
    }
}

/// `name;duration;rotation-flags`
fn convert_layer(builder: &mut KsonBuilder, value: &str) {
    let mut parts = value.split(';');
    let layer = builder.bg_layer();
    layer.filename = parts.next().map(str::to_string);
    if let Some(duration) = parts.next() {
        layer.duration = parse_or("layer", duration, 0);
    }
    if let Some(flags) = parts.next() {
        let flags: u32 = parse_or("layer", flags, 0);
        if flags > 0 {
            layer.rotation = Some(KshLayerRotationInfo {
                tilt: flags & 1 != 0,
                spin: flags & 2 != 0,
            });
        }
    }
}

/// First value of a key wins; repeats are kept as options at pulse 0.
fn add_unknown_meta(builder: &mut KsonBuilder, key: &str, value: &str) {
    let meta = builder.unknown_meta();
    if meta.contains_key(key) {
        builder.unknown_option(key).push((0, value.to_string()));
    } else {
        meta.insert(key.to_string(), value.to_string());
    }
}

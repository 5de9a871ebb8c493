// KSH structural model -> KSON semantic model

mod body;
mod builder;
mod effect;
mod header;
mod lanes;

use std::str::FromStr;

use kson_model::Kson;
use kson_model::schema::MAX_SAFE_INTEGER;

use crate::ast::Ksh;
use crate::config::ConverterConfig;
use crate::error::KshError;
use crate::parse::parse_ksh;

use builder::KsonBuilder;

/// Tempo assumed when a chart gives none, or an unreadable one
pub(crate) const DEFAULT_BPM: f64 = 120.0;

/// Converts KSH text into a KSON chart.
#[derive(Debug, Clone, Default)]
pub struct KshDecoder {
    config: ConverterConfig,
}

impl KshDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn decode_str(&self, text: &str) -> Result<Kson, KshError> {
        let ksh = parse_ksh(text);
        self.decode(&ksh)
    }

    pub fn decode(&self, ksh: &Ksh) -> Result<Kson, KshError> {
        ksh_to_kson_with_config(ksh, &self.config)
    }
}

/// Convert with the default [`ConverterConfig`].
pub fn ksh_to_kson(ksh: &Ksh) -> Result<Kson, KshError> {
    ksh_to_kson_with_config(ksh, &ConverterConfig::default())
}

pub fn ksh_to_kson_with_config(ksh: &Ksh, config: &ConverterConfig) -> Result<Kson, KshError> {
    let mut builder = KsonBuilder::new();

    let header = header::convert_header(ksh, config, &mut builder)?;
    effect::convert_definitions(&ksh.footer, &mut builder);
    body::convert_body(ksh, &header, &mut builder)?;

    let kson = builder.build();
    log::debug!(
        "Converted KSH: \"{}\", {} measures, {} BPM changes",
        kson.meta.title,
        ksh.body.len(),
        kson.beat.bpm.len()
    );

    if config.validate_output {
        kson.validate()?;
    }
    Ok(kson)
}

/// Integers a KSON document can carry exactly.
pub(crate) trait ChartInt: FromStr + Copy {
    fn in_range(self) -> bool;
}

impl ChartInt for u32 {
    fn in_range(self) -> bool {
        true
    }
}

impl ChartInt for u64 {
    fn in_range(self) -> bool {
        self <= MAX_SAFE_INTEGER
    }
}

impl ChartInt for i64 {
    fn in_range(self) -> bool {
        self.unsigned_abs() <= MAX_SAFE_INTEGER
    }
}

/// Parse an integer option value, falling back to `default` with a warning
/// when it is malformed or out of range.
pub(crate) fn parse_or<T: ChartInt>(key: &str, value: &str, default: T) -> T {
    match value.trim().parse::<T>() {
        Ok(v) if v.in_range() => v,
        _ => {
            log::warn!("Invalid value for {key}: {value:?}, using default");
            default
        }
    }
}

/// Like [`parse_or`] but reads only the leading integer, so `80.5` is 80.
pub(crate) fn parse_leading_or(key: &str, value: &str, default: i64) -> i64 {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && matches!(c, '-' | '+'))))
        .map_or(value.len(), |(i, _)| i);
    parse_or(key, &value[..end], default)
}

/// Like [`parse_or`] but also rejects NaN and infinities.
pub(crate) fn parse_finite_or(key: &str, value: &str, default: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::warn!("Invalid value for {key}: {value:?}, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or::<u32>("level", " 18 ", 1), 18);
        assert_eq!(parse_or::<u32>("level", "x", 1), 1);
        assert_eq!(parse_or::<i64>("mvol", "-5", 100), -5);
        assert_eq!(parse_or::<u64>("total", "9007199254740991", 0), 9_007_199_254_740_991);
        assert_eq!(parse_or::<u64>("total", "9007199254740992", 0), 0);
        assert_eq!(parse_or::<i64>("o", "-9007199254740992", 0), 0);
        assert_eq!(parse_finite_or("t", "180.5", 120.0), 180.5);
        assert_eq!(parse_finite_or("t", "inf", 120.0), 120.0);
        assert_eq!(parse_finite_or("t", "NaN", 120.0), 120.0);
    }

    #[test]
    fn test_parse_leading_or() {
        assert_eq!(parse_leading_or("mvol", "80.5", 100), 80);
        assert_eq!(parse_leading_or("mvol", " 75% ", 100), 75);
        assert_eq!(parse_leading_or("mvol", "-20", 100), -20);
        assert_eq!(parse_leading_or("mvol", "abc", 100), 100);
        assert_eq!(parse_leading_or("mvol", "-", 100), 100);
    }

    #[test]
    fn test_decoder_uses_config() {
        let decoder = KshDecoder::with_config(ConverterConfig {
            legacy_bgm_volume_scale: 0.5,
            ..Default::default()
        });
        let kson = decoder.decode_str("mvol=80\n--\n0000|00|--\n--").unwrap();
        let vol = kson.audio.and_then(|a| a.bgm).map(|bgm| bgm.vol);
        assert_eq!(vol, Some(0.4));
    }
}

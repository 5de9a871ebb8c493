use std::path::Path;

use anyhow::{Context, Result};
use ksh_model::{ConverterConfig, KshDecoder, parse_ksh, stringify_ksh};
use kson_model::Kson;

use crate::input::read_chart_file;

/// KSH file to KSON JSON.
pub fn convert(input: &Path, config: ConverterConfig, pretty: bool) -> Result<String> {
    let text = read_chart_file(input)?;
    let kson = KshDecoder::with_config(config)
        .decode_str(&text)
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    log::info!(
        "Converted {}: {} BT, {} FX, {} laser notes",
        input.display(),
        kson.note.bt.iter().map(Vec::len).sum::<usize>(),
        kson.note.fx.iter().map(Vec::len).sum::<usize>(),
        kson.note.laser.iter().map(Vec::len).sum::<usize>(),
    );
    let json = if pretty {
        kson.to_json_string_pretty()?
    } else {
        kson.to_json_string()?
    };
    Ok(json)
}

/// Check a KSON file against the schema.
pub fn validate(input: &Path) -> Result<Kson> {
    let text = read_chart_file(input)?;
    let kson = Kson::from_json_str(&text)
        .with_context(|| format!("{} is not a valid KSON chart", input.display()))?;
    log::info!("{} is valid (KSON {})", input.display(), kson.version);
    Ok(kson)
}

/// Structural model of a KSH file as JSON.
pub fn ast(input: &Path, pretty: bool) -> Result<String> {
    let ksh = parse_ksh(&read_chart_file(input)?);
    let json = if pretty {
        serde_json::to_string_pretty(&ksh)?
    } else {
        serde_json::to_string(&ksh)?
    };
    Ok(json)
}

/// Reprint a KSH file in canonical form.
pub fn fmt(input: &Path) -> Result<String> {
    let ksh = parse_ksh(&read_chart_file(input)?);
    Ok(stringify_ksh(&ksh))
}

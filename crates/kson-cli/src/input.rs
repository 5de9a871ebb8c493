use std::path::Path;

use anyhow::{Context, Result};

const BOM: &str = "\u{feff}";

/// Read a chart as text. Tries UTF-8 first, then Shift_JIS.
pub fn read_chart_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_chart_bytes(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

pub fn decode_chart_bytes(bytes: &[u8]) -> Result<String> {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return Ok(content.strip_prefix(BOM).unwrap_or(content).to_string());
    }

    // Older charts are saved in Shift_JIS
    let (content, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
    if had_errors {
        anyhow::bail!("Failed to decode file as UTF-8 or Shift-JIS");
    }
    log::debug!("Decoded chart as Shift_JIS");
    Ok(content.into_owned())
}

/// Write to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_utf8_with_bom() {
        let content = decode_chart_bytes("\u{feff}title=曲\n".as_bytes()).unwrap();
        assert_eq!(content, "title=曲\n");
    }

    #[test]
    fn test_shift_jis_fallback() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("title=テスト\n");
        assert!(std::str::from_utf8(&bytes).is_err());
        assert_eq!(decode_chart_bytes(&bytes).unwrap(), "title=テスト\n");
    }

    #[test]
    fn test_read_and_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "a=b").unwrap();
        assert_eq!(read_chart_file(&path).unwrap(), "a=b");
        assert!(read_chart_file(dir.path().join("missing.ksh")).is_err());
    }
}

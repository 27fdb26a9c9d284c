// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference line parsing and loading

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::errors::IngestError;
use crate::store::NewReferenceLine;

/// `text (page-line)` with the locator at the end of the line.
static LOCATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*\((\d+)-(\d+)\)\s*$").expect("locator pattern is valid")
});

/// Parse one line of a reference file.
///
/// A trailing `(page-line)` locator is split off; anything else is kept as
/// plain text without a location. Blank lines yield `None`.
pub fn parse_reference_line(raw: &str) -> Option<NewReferenceLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = LOCATOR.captures(trimmed) {
        let page = caps[2].parse::<u32>();
        let line = caps[3].parse::<u32>();
        if let (Ok(page), Ok(line)) = (page, line) {
            return Some(NewReferenceLine::new(caps[1].trim()).at(page, line));
        }
        warn!(line = trimmed, "locator out of range; keeping line without location");
    }
    Some(NewReferenceLine::new(trimmed))
}

/// Read a UTF-8 reference file, one entry per line, skipping the first
/// `skip_first` non-blank lines (title pages and headers).
pub fn read_reference_file(
    path: impl AsRef<Path>,
    skip_first: usize,
) -> Result<Vec<NewReferenceLine>, IngestError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content
        .lines()
        .filter_map(parse_reference_line)
        .skip(skip_first)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn locator_is_split_off() {
        let parsed = parse_reference_line("ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥ (1-4)").unwrap();
        assert_eq!(parsed.text, "ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥");
        assert_eq!(parsed.page, Some(1));
        assert_eq!(parsed.line, Some(4));
    }

    #[test]
    fn line_without_locator_keeps_whole_text() {
        let parsed = parse_reference_line("  ੴ ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ  ").unwrap();
        assert_eq!(parsed.text, "ੴ ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ");
        assert_eq!(parsed.page, None);
        assert_eq!(parsed.line, None);
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(parse_reference_line("   ").is_none());
    }

    #[test]
    fn oversized_locator_is_kept_as_text() {
        let parsed = parse_reference_line("ਸਚੁ (99999999999-1)").unwrap();
        assert_eq!(parsed.text, "ਸਚੁ (99999999999-1)");
        assert_eq!(parsed.page, None);
    }

    #[test]
    fn file_reader_skips_header_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ਸ੍ਰੀ ਗੁਰੂ ਗ੍ਰੰਥ ਸਾਹਿਬ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥ (1-4)").unwrap();
        writeln!(file, "ਹੈ ਭੀ ਸਚੁ ਨਾਨਕ ਹੋਸੀ ਭੀ ਸਚੁ ॥੧॥ (1-5)").unwrap();

        let lines = read_reference_file(file.path(), 1).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, Some(4));
        assert_eq!(lines[1].line, Some(5));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_reference_file("/nonexistent/versefind/lines.txt", 0).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/versefind/lines.txt"));
    }
}

//! Encoding detection and file reading with UTF-8 fallback logic.
//!
//! The file-ingestion prompt accepts arbitrary local source files, so reading
//! handles BOM markers, a strict UTF-8 fast path, a chardetng fallback for
//! legacy encodings, and binary detection.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Detect the encoding of a file.
///
/// BOM markers are checked first, then strict UTF-8 (the fast path for
/// modern source files), then chardetng. Errors fall back to "utf-8".
pub fn detect_encoding(path: &Path) -> String {
    detect_encoding_impl(path).unwrap_or_else(|_| "utf-8".to_string())
}

fn detect_encoding_impl(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut sample = vec![0u8; DEFAULT_SAMPLE_SIZE];
    let bytes_read = file.read(&mut sample)?;
    sample.truncate(bytes_read);

    if sample.is_empty() {
        return Ok("utf-8".to_string());
    }

    if sample.starts_with(&[0xef, 0xbb, 0xbf]) {
        return Ok("utf-8-sig".to_string());
    }
    if sample.starts_with(&[0xff, 0xfe]) {
        return Ok("utf-16-le".to_string());
    }
    if sample.starts_with(&[0xfe, 0xff]) {
        return Ok("utf-16-be".to_string());
    }

    if std::str::from_utf8(&sample).is_ok() {
        return Ok("utf-8".to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    let encoding = detector.guess(None, true);

    let name = encoding.name().to_lowercase();
    if name.contains("utf-8") || name == "ascii" {
        Ok("utf-8".to_string())
    } else {
        Ok(name)
    }
}

/// Detect if a file is binary (not text).
///
/// Null bytes are a strong binary indicator; otherwise a low ratio of
/// printable ASCII bytes (< 70%) in the sample marks the file binary.
/// Unreadable files report as binary so the caller reprompts.
pub fn is_binary_file(path: &Path) -> bool {
    is_binary_file_impl(path).unwrap_or(true)
}

fn is_binary_file_impl(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut sample = vec![0u8; DEFAULT_SAMPLE_SIZE];
    let bytes_read = file.read(&mut sample)?;
    sample.truncate(bytes_read);

    if sample.is_empty() {
        return Ok(false);
    }

    if sample.contains(&0) {
        return Ok(true);
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13)
        .count();

    Ok((printable_count as f64 / sample.len() as f64) < 0.70)
}

/// Read a file safely with encoding detection.
///
/// Tries strict UTF-8 first, falls back to the detected encoding with
/// replacement characters, and as a last resort decodes as UTF-8 with
/// replacement. Returns the content and the encoding label actually used.
pub fn read_file_safe(path: &Path) -> Result<(String, String)> {
    match try_read_utf8_strict(path) {
        Ok(content) => return Ok((content, "utf-8".to_string())),
        Err(_) => {
            // UTF-8 failed, continue to detection
        }
    }

    let detected = detect_encoding(path);
    if let Some((content, used_enc)) = try_read_with_encoding(path, &detected) {
        return Ok((content, used_enc));
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let (cow, _, _) = UTF_8.decode(&bytes);
    Ok((cow.into_owned(), "utf-8".to_string()))
}

fn try_read_utf8_strict(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let content = std::str::from_utf8(&bytes).context("Not valid UTF-8")?.to_string();
    Ok(content)
}

fn try_read_with_encoding(path: &Path, encoding_name: &str) -> Option<(String, String)> {
    let encoding = Encoding::for_label(encoding_name.as_bytes())?;
    let bytes = std::fs::read(path).ok()?;
    let (decoded, _encoding_used, _had_errors) = encoding.decode(&bytes);
    Some((decoded.into_owned(), encoding.name().to_lowercase()))
}

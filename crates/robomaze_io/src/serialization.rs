//! JSON helpers with optional gzip framing.
//!
//! Paths ending in `.gz` are compressed transparently.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string. Blank input is rejected up front.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    Ok(serde_json::from_str(json)?)
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Writes pretty JSON to `path`, gzip-compressed for `.gz` paths.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = to_json_pretty(data)?;
    let context = || format!("writing JSON to {:?}", path);

    let file = File::create(path).map_err(|e| IoError::FileSystem(e).with_context(context()))?;
    if is_gzip_path(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder
            .write_all(json.as_bytes())
            .and_then(|_| encoder.finish().map(|_| ()))
            .map_err(|e| IoError::compression(e.to_string()).with_context(context()))?;
    } else {
        let mut writer = BufWriter::new(file);
        writer
            .write_all(json.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| IoError::FileSystem(e).with_context(context()))?;
    }
    Ok(())
}

/// Reads JSON from `path`, decompressing `.gz` paths.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let context = || format!("reading JSON from {:?}", path);

    let file = File::open(path).map_err(|e| IoError::FileSystem(e).with_context(context()))?;
    let mut json = String::new();
    if is_gzip_path(path) {
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut json)
            .map_err(|e| IoError::compression(e.to_string()).with_context(context()))?;
    } else {
        BufReader::new(file)
            .read_to_string(&mut json)
            .map_err(|e| IoError::FileSystem(e).with_context(context()))?;
    }
    from_json(&json).map_err(|e| e.with_context(context()))
}

//! # File I/O Module
//!
//! Loading result documents and reading/writing the config file.
//!
//! - **Result documents**: either the full search response envelope
//!   (`{ "status": ..., "results": { ... } }`) or a bare attribute map
//! - **Config files**: TOML; a missing file means defaults
//! - **Atomic saves**: write to `.tmp`, sync, rename, so an interrupted save
//!   never leaves a truncated config behind
//!
//! ## Example
//!
//! ```rust,no_run
//! use lens_core::file_io::{load_config, load_result_file};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("factlens.toml"))?;
//! let results = load_result_file(Path::new("results.json"))?;
//! println!("{} attributes", results.map(|r| r.len()).unwrap_or(0));
//! # Ok::<(), lens_core::errors::LensError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::config::LensConfig;
use crate::errors::{LensError, LensResult};
use crate::request::SearchResponse;
use crate::results::ResultSet;

/// Parse a result document from a string.
///
/// A document is a response envelope when its `status` is a string.
/// Anything else is read as a bare attribute map, so aspects named
/// `status` or `results` still load. A status-less `{ "results": {...} }`
/// that is not a valid attribute map is retried as an envelope.
///
/// Returns `Ok(None)` for an envelope without results (the "no data" state).
///
/// # Errors
///
/// * `SerializationError` - not valid JSON, or not shaped like results
/// * `SearchFailed` - an envelope with a non-success status
pub fn parse_result_document(contents: &str) -> LensResult<Option<ResultSet>> {
    let value: serde_json::Value = serde_json::from_str(contents)
        .map_err(|e| LensError::serialization(format!("Invalid JSON: {}", e)))?;

    if value.is_null() {
        return Ok(None);
    }
    if value.get("status").is_some_and(serde_json::Value::is_string) {
        return parse_envelope(value);
    }

    match serde_json::from_value::<ResultSet>(value.clone()) {
        Ok(results) => Ok(Some(results)),
        Err(_) if value.get("results").is_some() => parse_envelope(value),
        Err(e) => Err(LensError::serialization(format!("Invalid result set: {}", e))),
    }
}

fn parse_envelope(value: serde_json::Value) -> LensResult<Option<ResultSet>> {
    let response: SearchResponse = serde_json::from_value(value)
        .map_err(|e| LensError::serialization(format!("Invalid search response: {}", e)))?;
    response.into_result_set()
}

/// Load a result document from disk.
pub fn load_result_file(path: &Path) -> LensResult<Option<ResultSet>> {
    let contents = read_to_string(path)?;
    let results = parse_result_document(&contents).map_err(|e| match e {
        LensError::SerializationError { reason } => {
            LensError::serialization(format!("{} in {}", reason, path.display()))
        }
        other => other,
    })?;
    info!(
        path = %path.display(),
        attributes = results.as_ref().map(ResultSet::len).unwrap_or(0),
        "result file loaded"
    );
    Ok(results)
}

/// Load the config file, or defaults if it does not exist.
///
/// # Errors
///
/// * `FileError` - the file exists but cannot be read
/// * `SerializationError` - invalid TOML
/// * `InvalidSetting` - a value failed validation
pub fn load_config(path: &Path) -> LensResult<LensConfig> {
    if !path.exists() {
        return Ok(LensConfig::default());
    }
    let contents = read_to_string(path)?;
    LensConfig::from_toml_str(&contents)
}

/// Save the config file with atomic write semantics.
///
/// 1. Serialize to TOML
/// 2. Write to a temporary file (`.tmp`)
/// 3. Sync to disk
/// 4. Rename over the target
pub fn save_config(config: &LensConfig, path: &Path) -> LensResult<()> {
    config.validate()?;
    let text = config.to_toml_string()?;
    let tmp_path = path.with_extension("toml.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        LensError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(text.as_bytes()).map_err(|e| {
        LensError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        LensError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LensError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_to_string(path: &Path) -> LensResult<String> {
    let mut file = File::open(path)
        .map_err(|e| LensError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| LensError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

//! JSON file helpers for recipes, engine configurations, and boards.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Read a file, mapping a missing path to `ConfigError::NotFound`.
pub fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = read_text(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Save a value as pretty-printed JSON, creating parent directories as needed.
pub fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

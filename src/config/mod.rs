//! JSON configuration for the command-line tools.
//!
//! Each tool takes a single argument, the path of its configuration file.

pub mod convert;
pub mod detect;

use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse a JSON configuration file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Path of the configuration file given as the only CLI argument.
pub fn config_path_from_args(program: &str) -> Result<PathBuf, String> {
    let mut args = env::args_os().skip(1);
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(PathBuf::from(path)),
        _ => Err(format!("Usage: {program} <config.json>")),
    }
}

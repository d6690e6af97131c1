use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration of `cascade_convert`.
///
/// The output form follows the output suffix: `.json` writes the compact
/// form, `.json.gz` / `.json.bz2` / `.json.zst` compress it.
#[derive(Clone, Debug, Deserialize)]
pub struct ConvertToolConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Indent uncompressed output.
    #[serde(default)]
    pub pretty: bool,
}

pub fn load_config(path: &Path) -> Result<ConvertToolConfig, String> {
    super::load_json(path)
}

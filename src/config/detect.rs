use crate::detector::DetectorParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DetectOutputConfig {
    pub format: OutputFormat,
    /// Where to write the JSON report; stdout when absent.
    pub json_out: Option<PathBuf>,
}

/// Configuration of `haar_detect`.
///
/// One input produces a full diagnostics report; several inputs are scanned
/// in parallel and reported as detection lists.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectToolConfig {
    pub cascade: PathBuf,
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub params: DetectorParams,
    #[serde(default)]
    pub output: DetectOutputConfig,
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let config: DetectToolConfig = super::load_json(path)?;
    if config.inputs.is_empty() {
        return Err(format!("Config {} lists no inputs", path.display()));
    }
    Ok(config)
}

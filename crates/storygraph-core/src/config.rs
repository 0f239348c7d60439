use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative location of the project config under a project root.
pub const CONFIG_PATH: &str = ".storygraph/config.toml";

/// Options for a validation pass.
///
/// None of these change what the SCC analyzer or the probe answer; they only
/// shape the report built on top of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Emit a one-node report for every self-loop.
    #[serde(default)]
    pub include_self_loops: bool,
    /// Compute the back-edges that break each reported loop.
    #[serde(default = "default_true")]
    pub suggest_breaks: bool,
    /// Sort members and reports for stable display.
    #[serde(default = "default_true")]
    pub sort_output: bool,
    /// Refuse to analyze graphs with more nodes than this.
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            include_self_loops: false,
            suggest_breaks: default_true(),
            sort_output: default_true(),
            max_nodes: None,
        }
    }
}

/// Load `.storygraph/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<ValidationConfig> {
    let path = project_root.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(ValidationConfig::default());
    }
    load_config_file(&path)
}

/// Load a config from an explicit path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<ValidationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ValidationConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

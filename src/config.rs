//! Configuration for fastvar
//!
//! Loaded from `fastvar.toml` (or `--config <path>`); every field has a
//! default so an absent file is not an error.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "fastvar.toml";

/// Selector form used for "deep" scoped style rules in Vue components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepSelector {
    /// `:deep(.name)`
    DeepFunction,
    /// `::v-deep .name`
    VDeep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastVarConfig {
    /// Insert legacy option entries at the top of their object instead of the bottom
    pub at_top: bool,

    /// Indentation unit when there is no sibling line to copy
    pub indent_width: usize,

    /// Annotate stateful declarations with a type in TypeScript scripts
    pub typescript_annotations: bool,

    pub deep_selector: DeepSelector,

    /// Directory for daily-rolling log files (console only when unset)
    pub log_dir: Option<PathBuf>,
}

impl Default for FastVarConfig {
    fn default() -> Self {
        Self {
            at_top: false,
            indent_width: 2,
            typescript_annotations: true,
            deep_selector: DeepSelector::DeepFunction,
            log_dir: None,
        }
    }
}

impl FastVarConfig {
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width.max(1))
    }

    /// Load configuration from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;
        let config: FastVarConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Explicit path if given, otherwise `./fastvar.toml` when present
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path, toml_content).map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        debug!("Saved configuration to: {}", path.display());
        Ok(())
    }
}

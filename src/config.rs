//! Generator configuration helpers.
//!
//! The config names the schema and dimension inputs plus the output
//! directory. Relative paths resolve against the directory holding the config
//! file, so a docs tree can be regenerated from any working directory.
use crate::render::{DEFAULT_EDGE_COLORS, DEFAULT_WRAP_WIDTH};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_LINK_TABLE: &str = "Dataset";
const MIN_WRAP_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocConfig {
    pub schema_version: u32,
    pub schema: PathBuf,
    pub dimensions: PathBuf,
    pub output_dir: PathBuf,
    /// Table whose columns document dimension link fields.
    #[serde(default = "default_link_table")]
    pub link_table: String,
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
    #[serde(default = "default_edge_colors")]
    pub edge_colors: Vec<String>,
}

fn default_link_table() -> String {
    DEFAULT_LINK_TABLE.to_string()
}

fn default_wrap_width() -> usize {
    DEFAULT_WRAP_WIDTH
}

fn default_edge_colors() -> Vec<String> {
    DEFAULT_EDGE_COLORS.iter().map(|c| c.to_string()).collect()
}

/// A config together with the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DocConfig,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.config.schema)
    }

    pub fn dimensions_path(&self) -> PathBuf {
        self.resolve(&self.config.dimensions)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir)
    }
}

/// Config written by `init`.
pub fn default_config() -> DocConfig {
    DocConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        schema: PathBuf::from("schema.yaml"),
        dimensions: PathBuf::from("dimensions.yaml"),
        output_dir: PathBuf::from("generated"),
        link_table: default_link_table(),
        wrap_width: DEFAULT_WRAP_WIDTH,
        edge_colors: default_edge_colors(),
    }
}

pub fn config_stub() -> Result<String> {
    serde_yaml::to_string(&default_config()).context("serialize config stub")
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: DocConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("parse config {}", path.display()))?;
    validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedConfig { config, base_dir })
}

/// Write the config stub; an existing file is kept unless `force` is set.
pub fn write_config_stub(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = config_stub()?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &DocConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.link_table.trim().is_empty() {
        return Err(anyhow!("link_table must be non-empty"));
    }
    if config.wrap_width < MIN_WRAP_WIDTH {
        return Err(anyhow!(
            "wrap_width must be at least {MIN_WRAP_WIDTH} (got {})",
            config.wrap_width
        ));
    }
    if config.edge_colors.is_empty() {
        return Err(anyhow!("edge_colors must list at least one color"));
    }
    if let Some(color) = config.edge_colors.iter().find(|c| c.trim().is_empty()) {
        return Err(anyhow!("edge_colors entries must be non-empty (got {color:?})"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

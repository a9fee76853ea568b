use anyhow::{Result, Context};
use crate::errors::{CliError, CliErrorKind};
use crate::commands::OutputFormat;
use tracing::debug;
use serde::Deserialize;
use std::{fs, path::PathBuf};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub default_format: Option<OutputFormat>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub api_base: String,
    pub default_format: OutputFormat,
}

impl EffectiveConfig {
    /// File first, then `CHECKPOINT_API_BASE` / `CHECKPOINT_FORMAT`.
    pub fn load() -> Result<Self> {
        let cfg_path = config_file_path();
        debug!(path=?cfg_path, exists=?cfg_path.exists(), "config.load.attempt");
        let mut file_cfg: FileConfig = if cfg_path.exists() {
            let content = fs::read_to_string(&cfg_path).with_context(|| format!("read config {cfg_path:?}"))
                .map_err(|e| CliError::with_source(CliErrorKind::Config("failed to read config".into()), e))?;
            debug!(len=content.len(), "config.read");
            match toml::from_str(&content) {
                Ok(v)=>{ debug!("config.parse.success"); v }
                Err(e)=>{ debug!(error=?e, "config.parse.error"); return Err(CliError::with_source(CliErrorKind::Config("failed to parse config".into()), e).into()); }
            }
        } else { FileConfig::default() };
        if let Ok(base) = std::env::var("CHECKPOINT_API_BASE") { if !base.is_empty() { file_cfg.api_base = Some(base); } }
        if let Ok(fmt) = std::env::var("CHECKPOINT_FORMAT") {
            if !fmt.is_empty() {
                let parsed = <OutputFormat as clap::ValueEnum>::from_str(&fmt, true)
                    .map_err(|e| CliError::new(CliErrorKind::Config(format!("CHECKPOINT_FORMAT: {e}"))))?;
                file_cfg.default_format = Some(parsed);
            }
        }
        Ok(Self {
            api_base: file_cfg.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            default_format: file_cfg.default_format.unwrap_or(OutputFormat::Text),
        })
    }

    pub fn with_api_base(mut self, base: Option<String>) -> Self {
        if let Some(b) = base { self.api_base = b; }
        self
    }
}

pub fn config_dir() -> PathBuf { dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("checkpoint") }
pub fn config_file_path() -> PathBuf { config_dir().join("config.toml") }

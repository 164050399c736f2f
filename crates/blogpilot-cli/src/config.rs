use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

/// `~/.blogpilot`, shared with the stored sessions.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".blogpilot");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Profiles stored in one `config.toml`.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(config_dir()?.join(CONFIG_FILE)))
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let cfg: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Invalid profile config in {}", self.path.display()))?;
        Ok(cfg)
    }

    pub fn load_profile(&self, profile: &str) -> Result<ProfileConfig> {
        Ok(self.load_all()?.remove(profile).unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &str, config: &ProfileConfig) -> Result<()> {
        let mut all = self.load_all()?;
        all.insert(profile.to_string(), config.clone());
        let content = toml::to_string_pretty(&all)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Set one key of a profile.
    pub fn set(&self, profile: &str, key: &str, value: &str) -> Result<()> {
        let mut cfg = self.load_profile(profile)?;
        match key {
            "server" => {
                url::Url::parse(value).with_context(|| format!("Invalid server URL: {value}"))?;
                cfg.server = Some(value.to_string());
            }
            "format" => {
                if OutputFormat::parse(value).is_none() {
                    anyhow::bail!("Unknown format: {value}. Valid formats: table, json");
                }
                cfg.format = Some(value.to_ascii_lowercase());
            }
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: server, format"),
        }
        self.save_profile(profile, &cfg)
    }

    /// Remember the server a profile signed in to, unless one is already set.
    pub fn remember_server(&self, profile: &str, server: &str) -> Result<()> {
        let mut cfg = self.load_profile(profile)?;
        if cfg.server.is_none() {
            cfg.server = Some(server.to_string());
            self.save_profile(profile, &cfg)?;
        }
        Ok(())
    }

    /// Server for this run:
    /// 1. `--server` flag / `BLOGPILOT_URL` env
    /// 2. the profile in `config.toml`
    /// 3. `api.base_url` of the client configuration
    pub fn resolve_server(
        &self,
        cli_server: Option<&str>,
        profile: &str,
        fallback: &str,
    ) -> Result<String> {
        if let Some(s) = cli_server {
            return Ok(s.to_string());
        }
        if let Some(s) = self.load_profile(profile)?.server {
            return Ok(s);
        }
        Ok(fallback.to_string())
    }

    pub fn resolve_format(&self, cli_format: Option<OutputFormat>, profile: &str) -> Result<OutputFormat> {
        if let Some(format) = cli_format {
            return Ok(format);
        }
        Ok(self
            .load_profile(profile)?
            .format
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or_default())
    }
}

//! Configuration file management for quill.
//!
//! Provides a TOML-based config file at `~/.config/quill/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use quill_core::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: ApiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSection {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the quill config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/quill` or `~/.config/quill`.
/// We intentionally ignore the platform-specific `dirs::config_dir()`
/// (which returns `~/Library/Application Support` on macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("quill");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("quill")
}

/// Return the path to the quill config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it holds an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct QuillConfig {
    pub llm: LlmConfig,
}

impl QuillConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `cli_api_key` > `QUILL_API_KEY` env > `config_file.api.key` > error
    /// - Base URL: `QUILL_BASE_URL` env > `config_file.api.base_url` > built-in default
    /// - Model: `QUILL_MODEL` env > `config_file.api.model` > built-in default
    pub fn resolve(cli_api_key: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let api_key = if let Some(key) = cli_api_key {
            key.to_string()
        } else if let Ok(key) = std::env::var("QUILL_API_KEY") {
            key
        } else if let Some(ref cfg) = file_config {
            cfg.api.key.clone()
        } else {
            bail!(
                "API key not found; set QUILL_API_KEY, pass --api-key, or run `quill init` to create a config file"
            );
        };

        let base_url = std::env::var("QUILL_BASE_URL")
            .ok()
            .or_else(|| file_config.as_ref().and_then(|c| c.api.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("QUILL_MODEL")
            .ok()
            .or_else(|| file_config.as_ref().and_then(|c| c.api.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            llm: LlmConfig::new(api_key)
                .with_base_url(base_url)
                .with_model(model),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/grab/config.toml`.
///
/// Holds defaults only; command-line flags override them when a
/// [`TransferSession`](crate::transfer::TransferSession) is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabConfig {
    /// Seconds between progress reports when `--interval` is not given.
    pub default_interval_secs: u64,
    /// Connect timeout in seconds for both the HEAD probe and the GET.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds for the HEAD probe. The GET has none.
    pub probe_timeout_secs: u64,
    /// Maximum number of redirects followed per request.
    pub max_redirections: u32,
    /// Optional `User-Agent` header; libcurl sends none when unset.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Read buffer size for `grabsum` when `--buffer-size` is not given.
    pub checksum_buffer_bytes: usize,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: 1,
            connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            max_redirections: 10,
            user_agent: None,
            checksum_buffer_bytes: 256,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("grab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: GrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

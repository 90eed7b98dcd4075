use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// FTP login used for file resources on FTP servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtpConfig {
    pub user: String,
    /// An e-mail address is the customary password for anonymous FTP, so
    /// server operators know who is using their service.
    pub password: String,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            user: "anonymous".to_string(),
            password: "help@reactome.org".to_string(),
        }
    }
}

/// HTTP transport timeouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds for HEAD and GET.
    pub connect_timeout_secs: u64,
    /// Total timeout in seconds for a HEAD probe. GET bodies are not bounded.
    pub head_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            head_timeout_secs: 30,
        }
    }
}

/// Headless browser used to render web page resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebPageConfig {
    /// Chromium-compatible executable (name on PATH or absolute path).
    pub browser: String,
    /// Time the page may run scripts before its DOM is read.
    pub settle_delay_secs: u64,
    /// Browser window size as "width,height".
    pub window_size: String,
}

impl Default for WebPageConfig {
    fn default() -> Self {
        Self {
            browser: "chromium".to_string(),
            settle_delay_secs: 10,
            window_size: "1920,1200".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/rescheck/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Largest acceptable drop in file size, in percent of the expected size (exclusive).
    pub acceptable_size_drop_percent: f64,
    #[serde(default)]
    pub ftp: FtpConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub web_page: WebPageConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            acceptable_size_drop_percent: 5.0,
            ftp: FtpConfig::default(),
            http: HttpConfig::default(),
            web_page: WebPageConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rescheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CheckerConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<CheckerConfig> {
    if !path.exists() {
        let default_cfg = CheckerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: CheckerConfig = toml::from_str(&data)?;
    Ok(cfg)
}

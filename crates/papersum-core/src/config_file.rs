use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SortBy;
use crate::api::DEFAULT_BASE_URL;

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "PAPERSUM_API_URL";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub search: Option<SearchConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_results: Option<u32>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Fully resolved settings with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub max_results: u32,
    pub sort_by: SortBy,
    pub theme: String,
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            max_results: 10,
            sort_by: SortBy::Relevance,
            theme: "hacker".to_string(),
            fps: 30,
        }
    }
}

/// Platform config directory path: `<config_dir>/papersum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papersum").join("config.toml"))
}

/// Load config by cascading CWD `.papersum.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".papersum.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api: Some(ApiConfig {
            base_url: overlay
                .api
                .as_ref()
                .and_then(|a| a.base_url.clone())
                .or_else(|| base.api.as_ref().and_then(|a| a.base_url.clone())),
        }),
        search: Some(SearchConfig {
            max_results: overlay
                .search
                .as_ref()
                .and_then(|s| s.max_results)
                .or_else(|| base.search.as_ref().and_then(|s| s.max_results)),
            sort_by: overlay
                .search
                .as_ref()
                .and_then(|s| s.sort_by.clone())
                .or_else(|| base.search.as_ref().and_then(|s| s.sort_by.clone())),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            fps: overlay
                .display
                .as_ref()
                .and_then(|d| d.fps)
                .or_else(|| base.display.as_ref().and_then(|d| d.fps)),
        }),
    }
}

/// Save a config to `path`, creating parent directories as needed.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_config_to(config, &path)?;
    Ok(path)
}

impl Settings {
    /// Fill defaults with whatever the file sets. Invalid values are ignored.
    pub fn from_file(file_cfg: &ConfigFile) -> Self {
        let mut settings = Self::default();
        if let Some(api) = &file_cfg.api {
            if let Some(url) = &api.base_url {
                if !url.trim().is_empty() {
                    settings.api_base_url = url.trim().to_string();
                }
            }
        }
        if let Some(search) = &file_cfg.search {
            if let Some(n) = search.max_results {
                settings.max_results = n.max(1);
            }
            if let Some(sort) = &search.sort_by {
                match sort.parse::<SortBy>() {
                    Ok(sort) => settings.sort_by = sort,
                    Err(e) => tracing::warn!(error = %e, "ignoring search.sort_by"),
                }
            }
        }
        if let Some(disp) = &file_cfg.display {
            if let Some(theme) = &disp.theme {
                if !theme.is_empty() {
                    settings.theme = theme.clone();
                }
            }
            if let Some(fps) = disp.fps {
                settings.fps = fps.clamp(1, 120);
            }
        }
        settings
    }

    /// Apply the CLI flag and `PAPERSUM_API_URL`: flag > env > file > default.
    pub fn with_api_url_override(mut self, flag: Option<String>) -> Self {
        let env = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());
        if let Some(url) = flag.or(env) {
            self.api_base_url = url;
        }
        self
    }

    /// Convert back into a file for saving.
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            api: Some(ApiConfig {
                base_url: Some(self.api_base_url.clone()),
            }),
            search: Some(SearchConfig {
                max_results: Some(self.max_results),
                sort_by: Some(self.sort_by.as_str().to_string()),
            }),
            display: Some(DisplayConfig {
                theme: Some(self.theme.clone()),
                fps: Some(self.fps),
            }),
        }
    }
}

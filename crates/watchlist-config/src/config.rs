use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_STORAGE_KEY: &str = "movie-app-watchlist";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the file backend; defaults to `<data_dir>/storage`
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Upper bound on entries; unbounded when unset
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// What to do when the stored value cannot be parsed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Back up the raw value and start with an empty list
    #[default]
    Reset,
    Fail,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_title_max_len")]
    pub title_max_len: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: Option<bool>,
    pub file: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_title_max_len() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            backend: StorageBackend::default(),
            dir: None,
            max_entries: None,
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl StorageConfig {
    /// Keys double as file names, so only `[A-Za-z0-9._-]` without a leading dot
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && !key.starts_with('.')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            title_max_len: default_title_max_len(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: None,
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !StorageConfig::is_valid_key(&self.storage.key) {
            return Err(anyhow::anyhow!(
                "Invalid storage key '{}': use letters, digits, '.', '_' or '-' \
                 and do not start with '.'",
                self.storage.key
            ));
        }

        if self.storage.max_entries == Some(0) {
            return Err(anyhow::anyhow!("storage.max_entries must be greater than zero"));
        }

        if self.display.title_max_len == 0 {
            return Err(anyhow::anyhow!("display.title_max_len must be greater than zero"));
        }

        if !self.display.image_base_url.starts_with("http") {
            return Err(anyhow::anyhow!(
                "display.image_base_url must be an http(s) URL, got '{}'",
                self.display.image_base_url
            ));
        }

        Ok(())
    }

    /// Resolve the storage directory, falling back to the given data directory
    pub fn storage_dir(&self, default_dir: &Path) -> PathBuf {
        self.storage
            .dir
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf())
    }
}

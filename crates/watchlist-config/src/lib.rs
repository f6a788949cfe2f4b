pub mod config;
pub mod paths;

pub use config::{
    Config, CorruptPolicy, DisplayConfig, LoggingConfig, StorageBackend, StorageConfig,
    DEFAULT_IMAGE_BASE_URL, DEFAULT_STORAGE_KEY,
};
pub use paths::{base_path_override, PathManager};

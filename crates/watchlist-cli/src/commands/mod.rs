pub mod clear;
pub mod config;
pub mod entries;
pub mod list;
pub mod prompts;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing::{debug, warn};
use watchlist_config::{Config, PathManager, StorageBackend};
use watchlist_core::{
    DisplayOptions, FileStore, KeyValueStore, MemoryStore, StoreOptions, WatchlistStore,
};
use watchlist_models::{Category, EntryKey};

/// Store and display settings for one CLI run
pub struct Session {
    pub store: WatchlistStore<Box<dyn KeyValueStore>>,
    pub display: DisplayOptions,
    pub location: String,
}

impl Session {
    pub fn open(config: &Config, paths: &PathManager) -> Result<Self> {
        let (storage, location): (Box<dyn KeyValueStore>, String) = match config.storage.backend {
            StorageBackend::File => {
                let dir = config.storage_dir(&paths.storage_dir());
                let store = FileStore::new(&dir).wrap_err_with(|| {
                    format!("Failed to open storage directory {}", dir.display())
                })?;
                let location = store.dir().display().to_string();
                (Box::new(store), location)
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage; changes are discarded when the command exits");
                (Box::new(MemoryStore::new()), "memory".to_string())
            }
        };
        debug!("Opening watchlist '{}' in {}", config.storage.key, location);

        let store = WatchlistStore::load(storage, StoreOptions::from_config(&config.storage))
            .wrap_err("Failed to load watchlist")?;

        Ok(Self {
            store,
            display: DisplayOptions::from_config(&config.display),
            location,
        })
    }
}

/// Accepts `category/id`, or a bare id together with `--category`.
pub fn resolve_target(target: &str, category: Option<Category>) -> Result<EntryKey> {
    if target.contains('/') {
        let key: EntryKey = target.parse().map_err(|e| eyre!("{}", e))?;
        if let Some(c) = category {
            if c != key.category {
                return Err(eyre!(
                    "--category {} conflicts with '{}'",
                    c,
                    target
                ));
            }
        }
        return Ok(key);
    }

    let id = target
        .trim()
        .parse::<u64>()
        .map_err(|e| eyre!("Invalid title id '{}': {}", target, e))?;
    let category = category.ok_or_else(|| {
        eyre!(
            "--category is required when giving a bare id (or use category/id, e.g. movie/{})",
            id
        )
    })?;
    Ok(EntryKey::new(id, category))
}

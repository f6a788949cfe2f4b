use crate::error::{Result, WatchlistError};
use crate::storage::KeyValueStore;
use crate::view::WatchlistGroups;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use watchlist_config::{CorruptPolicy, StorageConfig, DEFAULT_STORAGE_KEY};
use watchlist_models::{Category, EntryKey, NewEntry, WatchlistEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub key: String,
    pub max_entries: Option<usize>,
    pub on_corrupt: CorruptPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_entries: None,
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(storage: &StorageConfig) -> Self {
        Self {
            key: storage.key.clone(),
            max_entries: storage.max_entries,
            on_corrupt: storage.on_corrupt,
        }
    }

    /// Key the raw value is copied to when it fails to parse
    pub fn backup_key(&self) -> String {
        format!("{}.bak", self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn is_present(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }
}

/// Ordered watchlist mirrored into a [`KeyValueStore`].
///
/// The store is the only writer of its entries. Every mutation that changes the
/// list rewrites the whole value under `options.key`; if that write fails the
/// in-memory list is rolled back so memory and storage never disagree.
pub struct WatchlistStore<S> {
    storage: S,
    options: StoreOptions,
    entries: Vec<WatchlistEntry>,
}

impl<S: KeyValueStore> WatchlistStore<S> {
    /// Read prior state from storage. An absent or blank value yields an empty list.
    pub fn load(mut storage: S, options: StoreOptions) -> Result<Self> {
        if !StorageConfig::is_valid_key(&options.key) {
            return Err(WatchlistError::InvalidKey(options.key.clone()));
        }
        let entries = read_entries(&mut storage, &options)?;
        info!("Loaded watchlist '{}': {} entries", options.key, entries.len());
        Ok(Self { storage, options, entries })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64, category: Category) -> bool {
        self.position(id, category).is_some()
    }

    pub fn get(&self, id: u64, category: Category) -> Option<&WatchlistEntry> {
        self.position(id, category).map(|pos| &self.entries[pos])
    }

    pub fn groups(&self) -> WatchlistGroups<'_> {
        WatchlistGroups::from_entries(&self.entries)
    }

    pub fn add(&mut self, candidate: NewEntry) -> Result<AddOutcome> {
        self.add_at(candidate, Utc::now().timestamp_millis())
    }

    /// Append `candidate` stamped with `added_at` unless its `(id, category)` is present.
    pub fn add_at(&mut self, candidate: NewEntry, added_at: i64) -> Result<AddOutcome> {
        let key = candidate.key();
        if self.contains(key.id, key.category) {
            debug!("Watchlist already contains {}, skipping add", key);
            return Ok(AddOutcome::AlreadyPresent);
        }

        // Non-finite floats serialize as null and would poison the stored value
        if !candidate.vote_average.is_finite() {
            return Err(WatchlistError::InvalidRating(candidate.vote_average));
        }

        if let Some(limit) = self.options.max_entries {
            if self.entries.len() >= limit {
                warn!("Watchlist is full ({} entries), rejecting {}", limit, key);
                return Err(WatchlistError::CapacityReached { limit });
            }
        }

        self.entries.push(candidate.into_entry(added_at));
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }

        info!("Added {} to watchlist ({} entries)", key, self.entries.len());
        Ok(AddOutcome::Added)
    }

    /// Remove the entry for `(id, category)`. Returns false when nothing matched.
    pub fn remove(&mut self, id: u64, category: Category) -> Result<bool> {
        let key = EntryKey::new(id, category);
        let Some(pos) = self.position(id, category) else {
            debug!("Watchlist does not contain {}, skipping remove", key);
            return Ok(false);
        };

        let removed = self.entries.remove(pos);
        if let Err(e) = self.persist() {
            self.entries.insert(pos, removed);
            return Err(e);
        }

        info!("Removed {} from watchlist ({} entries)", key, self.entries.len());
        Ok(true)
    }

    pub fn toggle(&mut self, candidate: NewEntry) -> Result<ToggleOutcome> {
        self.toggle_at(candidate, Utc::now().timestamp_millis())
    }

    pub fn toggle_at(&mut self, candidate: NewEntry, added_at: i64) -> Result<ToggleOutcome> {
        if self.remove(candidate.id, candidate.category)? {
            return Ok(ToggleOutcome::Removed);
        }
        self.add_at(candidate, added_at)?;
        Ok(ToggleOutcome::Added)
    }

    /// Drop every entry and delete the stored value
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(&self.options.key)?;
        let cleared = self.entries.len();
        self.entries.clear();
        info!("Cleared watchlist '{}' ({} entries)", self.options.key, cleared);
        Ok(())
    }

    /// Re-read storage, picking up changes made outside this store
    pub fn reload(&mut self) -> Result<()> {
        self.entries = read_entries(&mut self.storage, &self.options)?;
        debug!("Reloaded watchlist '{}': {} entries", self.options.key, self.entries.len());
        Ok(())
    }

    fn position(&self, id: u64, category: Category) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(id, category))
    }

    fn persist(&mut self) -> Result<()> {
        let value = serde_json::to_string(&self.entries).map_err(WatchlistError::Serialize)?;
        self.storage.set(&self.options.key, &value)
    }
}

fn read_entries<S: KeyValueStore>(
    storage: &mut S,
    options: &StoreOptions,
) -> Result<Vec<WatchlistEntry>> {
    let raw = match storage.get(&options.key)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            debug!("No stored watchlist under '{}', starting empty", options.key);
            return Ok(Vec::new());
        }
    };

    match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
        Ok(entries) => Ok(dedupe(entries)),
        Err(e) => match options.on_corrupt {
            CorruptPolicy::Fail => Err(WatchlistError::CorruptData {
                key: options.key.clone(),
                source: e,
            }),
            CorruptPolicy::Reset => {
                let backup_key = options.backup_key();
                match storage.set(&backup_key, &raw) {
                    Ok(()) => {
                        warn!(
                            "Stored watchlist '{}' is corrupt ({}). Backed up to '{}' \
                             and starting with an empty list.",
                            options.key, e, backup_key
                        );
                        if let Err(rm_err) = storage.remove(&options.key) {
                            warn!("Failed to delete corrupt watchlist value: {}", rm_err);
                        }
                    }
                    Err(backup_err) => {
                        warn!(
                            "Stored watchlist '{}' is corrupt ({}) and could not be backed up: {}. \
                             Starting with an empty list.",
                            options.key, e, backup_err
                        );
                    }
                }
                Ok(Vec::new())
            }
        },
    }
}

/// Keep the first entry for each `(id, category)`
fn dedupe(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let total = entries.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<WatchlistEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.key()))
        .collect();
    if unique.len() < total {
        warn!("Dropped {} duplicate watchlist entries on load", total - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests;

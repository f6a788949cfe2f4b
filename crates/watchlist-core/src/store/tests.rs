use super::*;
use crate::storage::{FileStore, MemoryStore};
use tempfile::TempDir;

fn movie(id: u64, title: &str) -> NewEntry {
    NewEntry::new(id, Category::Movie, title)
}

fn show(id: u64, title: &str) -> NewEntry {
    NewEntry::new(id, Category::Tv, title)
}

fn empty_store() -> WatchlistStore<MemoryStore> {
    WatchlistStore::load(MemoryStore::new(), StoreOptions::default()).unwrap()
}

/// Storage whose writes can be switched off to simulate quota or disk errors
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(WatchlistError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[test]
fn test_load_empty_storage() {
    let store = empty_store();
    assert_eq!(store.count(), 0);
    assert!(store.is_empty());
    assert!(store.entries().is_empty());
}

#[test]
fn test_load_blank_value_is_empty() {
    let mut storage = MemoryStore::new();
    storage.set(DEFAULT_STORAGE_KEY, "   ").unwrap();
    let store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    assert_eq!(store.count(), 0);
}

#[test]
fn test_same_id_different_category_are_distinct() {
    let mut store = empty_store();
    assert_eq!(store.add(movie(1, "A")).unwrap(), AddOutcome::Added);
    assert_eq!(store.add(show(1, "A")).unwrap(), AddOutcome::Added);

    assert!(store.contains(1, Category::Movie));
    assert!(store.contains(1, Category::Tv));
    assert_eq!(store.count(), 2);
}

#[test]
fn test_duplicate_add_is_noop() {
    let mut store = empty_store();
    assert_eq!(store.add_at(movie(5, "First"), 100).unwrap(), AddOutcome::Added);
    assert_eq!(
        store.add_at(movie(5, "Second"), 200).unwrap(),
        AddOutcome::AlreadyPresent
    );

    assert_eq!(store.count(), 1);
    let entry = store.get(5, Category::Movie).unwrap();
    assert_eq!(entry.added_at, 100);
    assert_eq!(entry.title, "First");
}

#[test]
fn test_add_then_remove() {
    let mut store = empty_store();
    store.add(movie(5, "A")).unwrap();
    assert!(store.remove(5, Category::Movie).unwrap());

    assert!(!store.contains(5, Category::Movie));
    assert_eq!(store.count(), 0);
}

#[test]
fn test_remove_absent_is_noop() {
    let mut store = empty_store();
    store.add_at(movie(1, "A"), 10).unwrap();
    let before = store.entries().to_vec();

    assert!(!store.remove(2, Category::Movie).unwrap());
    assert!(!store.remove(1, Category::Tv).unwrap());
    assert_eq!(store.entries(), before.as_slice());
}

#[test]
fn test_remove_only_touches_matching_pair() {
    let mut store = empty_store();
    store.add(movie(1, "A")).unwrap();
    store.add(show(1, "A")).unwrap();
    store.add(movie(2, "B")).unwrap();

    store.remove(1, Category::Movie).unwrap();
    let keys: Vec<EntryKey> = store.entries().iter().map(|e| e.key()).collect();
    assert_eq!(
        keys,
        vec![EntryKey::new(1, Category::Tv), EntryKey::new(2, Category::Movie)]
    );
}

#[test]
fn test_add_stamps_current_time() {
    let before = Utc::now().timestamp_millis();
    let mut store = empty_store();
    store.add(movie(9, "Now")).unwrap();
    let after = Utc::now().timestamp_millis();

    let added_at = store.get(9, Category::Movie).unwrap().added_at;
    assert!(added_at >= before && added_at <= after);
}

#[test]
fn test_contains_tracks_latest_operation() {
    let mut store = empty_store();
    let ops: Vec<(bool, u64, Category)> = vec![
        (true, 1, Category::Movie),
        (true, 2, Category::Tv),
        (false, 1, Category::Movie),
        (true, 1, Category::Movie),
        (false, 2, Category::Tv),
        (false, 3, Category::Movie),
        (true, 2, Category::Movie),
    ];

    let mut expected: HashSet<EntryKey> = HashSet::new();
    for (is_add, id, category) in ops {
        if is_add {
            store.add(NewEntry::new(id, category, "t")).unwrap();
            expected.insert(EntryKey::new(id, category));
        } else {
            store.remove(id, category).unwrap();
            expected.remove(&EntryKey::new(id, category));
        }

        for id in 1..=3 {
            for category in Category::ALL {
                assert_eq!(
                    store.contains(id, category),
                    expected.contains(&EntryKey::new(id, category))
                );
            }
        }
        assert_eq!(store.count(), expected.len());
        assert_eq!(store.count(), store.entries().len());
    }
}

#[test]
fn test_every_mutation_rewrites_storage() {
    let mut store = empty_store();
    store.add_at(movie(1, "A"), 1).unwrap();
    store.add_at(show(2, "B"), 2).unwrap();

    let raw = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let persisted: Vec<WatchlistEntry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, store.entries());

    store.remove(1, Category::Movie).unwrap();
    let raw = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let persisted: Vec<WatchlistEntry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].key(), EntryKey::new(2, Category::Tv));
}

#[test]
fn test_round_trip_preserves_order_and_values() {
    let mut store = empty_store();
    store
        .add_at(movie(603, "The Matrix").with_poster("/m.jpg").with_vote_average(8.2), 10)
        .unwrap();
    store.add_at(show(1399, "Game of Thrones").with_vote_average(8.4), 20).unwrap();
    store.add_at(movie(27205, "Inception"), 30).unwrap();
    let original = store.entries().to_vec();

    let reloaded = WatchlistStore::load(store.into_storage(), StoreOptions::default()).unwrap();
    assert_eq!(reloaded.entries(), original.as_slice());
}

#[test]
fn test_file_backed_round_trip() {
    let dir = TempDir::new().unwrap();
    {
        let storage = FileStore::new(dir.path()).unwrap();
        let mut store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
        store.add_at(movie(1, "A"), 1).unwrap();
        store.add_at(show(2, "B"), 2).unwrap();
    }

    let storage = FileStore::new(dir.path()).unwrap();
    let store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    assert_eq!(store.count(), 2);
    assert!(store.contains(1, Category::Movie));
    assert!(store.contains(2, Category::Tv));
}

#[test]
fn test_toggle_adds_then_removes() {
    let mut store = empty_store();
    assert_eq!(store.toggle(movie(4, "D")).unwrap(), ToggleOutcome::Added);
    assert!(store.contains(4, Category::Movie));

    assert_eq!(store.toggle(movie(4, "D")).unwrap(), ToggleOutcome::Removed);
    assert!(!store.contains(4, Category::Movie));
    assert_eq!(store.count(), 0);
}

#[test]
fn test_groups_follow_store() {
    let mut store = empty_store();
    store.add(movie(1, "A")).unwrap();
    store.add(show(2, "B")).unwrap();
    store.add(movie(3, "C")).unwrap();

    let groups = store.groups();
    assert_eq!(groups.movies.len(), 2);
    assert_eq!(groups.tv.len(), 1);
}

#[test]
fn test_clear_removes_stored_value() {
    let mut store = empty_store();
    store.add(movie(1, "A")).unwrap();
    store.clear().unwrap();

    assert_eq!(store.count(), 0);
    assert_eq!(store.storage().get(DEFAULT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn test_reload_picks_up_external_clear() {
    let dir = TempDir::new().unwrap();
    let storage = FileStore::new(dir.path()).unwrap();
    let mut store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    store.add(movie(1, "A")).unwrap();

    let mut other = FileStore::new(dir.path()).unwrap();
    other.remove(DEFAULT_STORAGE_KEY).unwrap();

    store.reload().unwrap();
    assert_eq!(store.count(), 0);
}

#[test]
fn test_corrupt_value_resets_with_backup() {
    let mut storage = MemoryStore::new();
    storage.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();

    let store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    assert_eq!(store.count(), 0);

    let backup_key = store.options().backup_key();
    assert_eq!(
        store.storage().get(&backup_key).unwrap().as_deref(),
        Some("{not json")
    );
    assert_eq!(store.storage().get(DEFAULT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn test_corrupt_value_fails_when_configured() {
    let mut storage = MemoryStore::new();
    storage.set(DEFAULT_STORAGE_KEY, r#"[{"id":"x"}]"#).unwrap();

    let options = StoreOptions {
        on_corrupt: CorruptPolicy::Fail,
        ..StoreOptions::default()
    };
    let result = WatchlistStore::load(storage, options);
    assert!(matches!(result, Err(WatchlistError::CorruptData { .. })));
}

#[test]
fn test_load_drops_duplicate_pairs() {
    let mut storage = MemoryStore::new();
    let raw = r#"[
        {"id":1,"title":"A","poster_path":"","vote_average":0,"category":"movie","added_at":1},
        {"id":1,"title":"A again","poster_path":"","vote_average":0,"category":"movie",
         "added_at":2},
        {"id":1,"title":"A","poster_path":"","vote_average":0,"category":"tv","added_at":3}
    ]"#;
    storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();

    let store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    assert_eq!(store.count(), 2);
    assert_eq!(store.get(1, Category::Movie).unwrap().added_at, 1);
}

#[test]
fn test_capacity_limit() {
    let options = StoreOptions {
        max_entries: Some(2),
        ..StoreOptions::default()
    };
    let mut store = WatchlistStore::load(MemoryStore::new(), options).unwrap();
    store.add(movie(1, "A")).unwrap();
    store.add(movie(2, "B")).unwrap();

    assert!(matches!(
        store.add(movie(3, "C")),
        Err(WatchlistError::CapacityReached { limit: 2 })
    ));
    // Duplicates stay no-ops even when full
    assert_eq!(store.add(movie(2, "B")).unwrap(), AddOutcome::AlreadyPresent);
    assert_eq!(store.count(), 2);

    store.remove(1, Category::Movie).unwrap();
    assert_eq!(store.add(movie(3, "C")).unwrap(), AddOutcome::Added);
}

#[test]
fn test_failed_write_leaves_memory_unchanged() {
    let mut store = WatchlistStore::load(FlakyStore::default(), StoreOptions::default()).unwrap();
    store.add_at(movie(1, "A"), 1).unwrap();
    store.add_at(movie(2, "B"), 2).unwrap();
    let before = store.entries().to_vec();

    let mut storage = store.into_storage();
    storage.fail_writes = true;
    let mut store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();

    assert!(store.add(movie(3, "C")).is_err());
    assert!(store.remove(1, Category::Movie).is_err());
    assert_eq!(store.entries(), before.as_slice());
}

#[test]
fn test_invalid_key_rejected_on_load() {
    let options = StoreOptions {
        key: "../escape".to_string(),
        ..StoreOptions::default()
    };
    assert!(matches!(
        WatchlistStore::load(MemoryStore::new(), options),
        Err(WatchlistError::InvalidKey(_))
    ));
}

#[test]
fn test_options_from_config() {
    let config = StorageConfig {
        key: "wl".to_string(),
        max_entries: Some(5),
        on_corrupt: CorruptPolicy::Fail,
        ..StorageConfig::default()
    };
    let options = StoreOptions::from_config(&config);
    assert_eq!(options.key, "wl");
    assert_eq!(options.max_entries, Some(5));
    assert_eq!(options.backup_key(), "wl.bak");
}

#[test]
fn test_non_finite_rating_is_rejected() {
    let mut store = empty_store();
    store.add_at(movie(1, "Kept"), 1).unwrap();

    for vote in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            store.add(movie(2, "Bad").with_vote_average(vote)),
            Err(WatchlistError::InvalidRating(_))
        ));
    }
    assert_eq!(store.count(), 1);

    store.add_at(show(3, "Rated").with_vote_average(7.5), 3).unwrap();
    let reloaded = WatchlistStore::load(store.into_storage(), StoreOptions::default()).unwrap();
    assert_eq!(reloaded.count(), 2);
}

#[test]
fn test_load_accepts_null_poster_and_rating() {
    let mut storage = MemoryStore::new();
    let raw = r#"[
        {"id":603,"title":"The Matrix","poster_path":"/m.jpg","vote_average":8.2,
         "category":"movie","added_at":1},
        {"id":82856,"title":"The Mandalorian","poster_path":null,"vote_average":null,
         "category":"tv","added_at":2}
    ]"#;
    storage.set(DEFAULT_STORAGE_KEY, raw).unwrap();

    let store = WatchlistStore::load(storage, StoreOptions::default()).unwrap();
    assert_eq!(store.count(), 2);
    let show = store.get(82856, Category::Tv).unwrap();
    assert_eq!(show.poster_path, "");
    assert_eq!(show.vote_average, 0.0);
    assert_eq!(store.storage().get(&store.options().backup_key()).unwrap(), None);
}

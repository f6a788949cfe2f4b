use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: u64, // Unique only together with category
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_path: String, // null for titles without artwork
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    pub category: Category,
    pub added_at: i64, // Epoch milliseconds, set once on insert
}

/// Read a JSON `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WatchlistEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.id, self.category)
    }

    pub fn matches(&self, id: u64, category: Category) -> bool {
        self.id == id && self.category == category
    }

    pub fn added_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.added_at).single()
    }
}

/// A title the user asked to add; the store stamps `added_at` on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    pub category: Category,
}

impl NewEntry {
    pub fn new(id: u64, category: Category, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: String::new(),
            vote_average: 0.0,
            category,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = poster_path.into();
        self
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = vote_average;
        self
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.id, self.category)
    }

    pub fn into_entry(self, added_at: i64) -> WatchlistEntry {
        WatchlistEntry {
            id: self.id,
            title: self.title,
            poster_path: self.poster_path,
            vote_average: self.vote_average,
            category: self.category,
            added_at,
        }
    }
}

/// Identity of an entry: `(id, category)`.
///
/// Displays and parses as `category/id` (e.g. `movie/603`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub id: u64,
    pub category: Category,
}

impl EntryKey {
    pub fn new(id: u64, category: Category) -> Self {
        Self { id, category }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntryKeyError {
    message: String,
}

impl fmt::Display for ParseEntryKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseEntryKeyError {}

impl FromStr for EntryKey {
    type Err = ParseEntryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, id) = s
            .trim()
            .trim_start_matches('/')
            .split_once('/')
            .ok_or_else(|| ParseEntryKeyError {
                message: format!(
                    "invalid entry key '{}' (expected category/id, e.g. movie/603)",
                    s
                ),
            })?;
        let category = category.parse::<Category>().map_err(|e| ParseEntryKeyError {
            message: e.to_string(),
        })?;
        let id = id.parse::<u64>().map_err(|e| ParseEntryKeyError {
            message: format!("invalid id '{}' in entry key: {}", id, e),
        })?;
        Ok(EntryKey { id, category })
    }
}

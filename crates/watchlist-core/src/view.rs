use serde::Serialize;
use watchlist_config::{DisplayConfig, DEFAULT_IMAGE_BASE_URL};
use watchlist_models::{Category, WatchlistEntry};

pub const EMPTY_MESSAGE: &str = "Your watchlist is empty";
pub const EMPTY_HINT: &str =
    "Start adding movies and TV shows to keep track of what you want to watch";

/// Label for the add/remove control of a title
pub fn toggle_label(present: bool) -> &'static str {
    if present {
        "Remove from watchlist"
    } else {
        "Add to watchlist"
    }
}

/// Entries split by category, insertion order kept within each group
#[derive(Debug, Default)]
pub struct WatchlistGroups<'a> {
    pub movies: Vec<&'a WatchlistEntry>,
    pub tv: Vec<&'a WatchlistEntry>,
}

impl<'a> WatchlistGroups<'a> {
    pub fn from_entries(entries: &'a [WatchlistEntry]) -> Self {
        let mut groups = Self::default();
        for entry in entries {
            match entry.category {
                Category::Movie => groups.movies.push(entry),
                Category::Tv => groups.tv.push(entry),
            }
        }
        groups
    }

    pub fn get(&self, category: Category) -> &[&'a WatchlistEntry] {
        match category {
            Category::Movie => &self.movies,
            Category::Tv => &self.tv,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.tv.is_empty()
    }

    /// Non-empty groups, movies first
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[&'a WatchlistEntry])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, entries)| !entries.is_empty())
    }

    /// e.g. `Movies (3)`
    pub fn heading(&self, category: Category) -> String {
        format!("{} ({})", category.heading(), self.get(category).len())
    }
}

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub image_base_url: String,
    pub title_max_len: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            title_max_len: 50,
        }
    }
}

impl DisplayOptions {
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            image_base_url: display.image_base_url.clone(),
            title_max_len: display.title_max_len,
        }
    }

    pub fn poster_url(&self, poster_path: &str) -> Option<String> {
        let path = poster_path.trim().trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        Some(format!("{}/{}", self.image_base_url.trim_end_matches('/'), path))
    }

    /// Long titles are cut at the first ':' ("Title: Subtitle" -> "Title")
    pub fn display_title(&self, title: &str) -> String {
        if title.chars().count() > self.title_max_len {
            title.split(':').next().unwrap_or(title).to_string()
        } else {
            title.to_string()
        }
    }
}

/// Rating shown on a card, one decimal; hidden for unrated titles
pub fn rating_label(vote_average: f64) -> Option<String> {
    if vote_average > 0.0 {
        Some(format!("{:.1}", vote_average))
    } else {
        None
    }
}

/// Everything a list renders for one entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub key: String,
    pub id: u64,
    pub category: Category,
    pub title: String,
    pub display_title: String,
    pub poster_url: Option<String>,
    pub rating: Option<String>,
    pub detail_path: String,
    pub added_at: i64,
    pub added_at_rfc3339: Option<String>,
}

impl CardView {
    pub fn new(entry: &WatchlistEntry, display: &DisplayOptions) -> Self {
        Self {
            key: entry.key().to_string(),
            id: entry.id,
            category: entry.category,
            title: entry.title.clone(),
            display_title: display.display_title(&entry.title),
            poster_url: display.poster_url(&entry.poster_path),
            rating: rating_label(entry.vote_average),
            detail_path: format!("/{}/{}", entry.category, entry.id),
            added_at: entry.added_at,
            added_at_rfc3339: entry.added_at_utc().map(|dt| dt.to_rfc3339()),
        }
    }
}

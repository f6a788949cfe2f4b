use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Movie,
    Tv,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Movie, Category::Tv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Tv => "tv",
        }
    }

    /// Heading used when a list is grouped by category
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Movie => "Movies",
            Category::Tv => "TV Shows",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    input: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}' (expected 'movie' or 'tv')", self.input)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(Category::Movie),
            "tv" | "show" | "shows" => Ok(Category::Tv),
            _ => Err(ParseCategoryError { input: s.to_string() }),
        }
    }
}

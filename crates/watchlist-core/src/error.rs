use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize watchlist: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored value under '{key}' is not a valid watchlist: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("watchlist is full ({limit} entries)")]
    CapacityReached { limit: usize },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("rating must be a finite number, got {0}")]
    InvalidRating(f64),
}

pub type Result<T> = std::result::Result<T, WatchlistError>;

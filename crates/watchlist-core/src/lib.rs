pub mod error;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{Result, WatchlistError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{AddOutcome, StoreOptions, ToggleOutcome, WatchlistStore};
pub use view::{CardView, DisplayOptions, WatchlistGroups, EMPTY_HINT, EMPTY_MESSAGE};

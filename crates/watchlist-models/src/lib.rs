pub mod category;
pub mod entry;

pub use category::{Category, ParseCategoryError};
pub use entry::{EntryKey, NewEntry, ParseEntryKeyError, WatchlistEntry};

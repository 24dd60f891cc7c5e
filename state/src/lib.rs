//! Persistence of the per-ticker alert state between runs.

pub mod store;

pub use store::json_store::JsonFileStore;
pub use store::sqlite_store::SqliteStateStore;
pub use store::{AlertStateStore, StateBackend, load_or_empty, open_store};

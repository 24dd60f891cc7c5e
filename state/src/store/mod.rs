pub mod json_store;
pub mod sqlite_store;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use corelib::AlertState;
use serde::Deserialize;
use tracing::warn;

#[async_trait::async_trait]
pub trait AlertStateStore: Send + Sync {
    /// Full mapping as last saved. A store that was never written yields an
    /// empty state.
    async fn load(&self) -> anyhow::Result<AlertState>;

    /// Replace the stored mapping with `state` as a whole.
    async fn save(&self, state: &AlertState) -> anyhow::Result<()>;
}

/// Load the state, or start from an empty one when the store is unreadable.
pub async fn load_or_empty(store: &dyn AlertStateStore) -> AlertState {
    match store.load().await {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "alert state unreadable; starting with empty state");
            AlertState::new()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    #[default]
    Json,
    Sqlite,
}

impl fmt::Display for StateBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateBackend::Json => f.write_str("json"),
            StateBackend::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl FromStr for StateBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(StateBackend::Json),
            "sqlite" => Ok(StateBackend::Sqlite),
            other => Err(anyhow::anyhow!("Invalid StateBackend value: {}", other)),
        }
    }
}

/// Build the configured store for `path`.
pub async fn open_store(backend: StateBackend, path: &str) -> anyhow::Result<Arc<dyn AlertStateStore>> {
    let store: Arc<dyn AlertStateStore> = match backend {
        StateBackend::Json => Arc::new(json_store::JsonFileStore::new(path)),
        StateBackend::Sqlite => Arc::new(sqlite_store::SqliteStateStore::new(path).await?),
    };
    Ok(store)
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use corelib::AlertState;
use tracing::debug;

use super::AlertStateStore;

/// State kept as a pretty-printed JSON object, `{"AAPL": "up", ...}`.
///
/// Saves go to `<file>.tmp` first and are renamed over the target, so a
/// crash mid-write leaves the previous file intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl AlertStateStore for JsonFileStore {
    async fn load(&self) -> anyhow::Result<AlertState> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet");
                return Ok(AlertState::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };

        let state = serde_json::from_str(&text)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(state)
    }

    async fn save(&self, state: &AlertState) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let text = serde_json::to_string_pretty(state)?;
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, text)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), tickers = state.len(), "alert state saved");
        Ok(())
    }
}

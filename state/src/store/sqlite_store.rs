//! SQLite-backed alert state.
//!
//! One row per ticker. `save` rewrites the whole table inside a single
//! transaction, so readers never observe a half-written mapping.

use std::str::FromStr;

use async_trait::async_trait;
use corelib::{AlertDirection, AlertState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::AlertStateStore;

pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    /// Wrap an existing pool. The schema must exist; see [`Self::ensure_schema`].
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// `path` is either a file path or a full `sqlite:` URL.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite://{path}")
        };

        let opts = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

        // A single connection keeps `sqlite::memory:` databases shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alert_state (
                ticker TEXT PRIMARY KEY,
                direction TEXT NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AlertStateStore for SqliteStateStore {
    async fn load(&self) -> anyhow::Result<AlertState> {
        let rows = sqlx::query("SELECT ticker, direction FROM alert_state")
            .fetch_all(&self.pool)
            .await?;

        let mut state = AlertState::new();
        for row in rows {
            let ticker: String = row.get("ticker");
            let dir_str: String = row.get("direction");
            let direction = AlertDirection::from_str(&dir_str)
                .map_err(|e| anyhow::anyhow!("Invalid direction for '{}': {}", ticker, e))?;
            state.set(ticker, direction);
        }

        Ok(state)
    }

    async fn save(&self, state: &AlertState) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM alert_state")
            .execute(&mut *tx)
            .await?;

        for (ticker, direction) in state.iter() {
            sqlx::query("INSERT INTO alert_state (ticker, direction) VALUES (?1, ?2)")
                .bind(ticker)
                .bind(direction.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(tickers = state.len(), "alert state saved to sqlite");
        Ok(())
    }
}

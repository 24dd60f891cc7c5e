#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use adapters::{NewsQuery, NewsSource, Notifier};
use async_trait::async_trait;
use corelib::{AlertPayload, AlertState, Headline, PriceObservation};
use market::PriceSource;
use state::AlertStateStore;
use tokio::sync::Mutex;

/// Prices keyed by ticker; tickers without an entry fail to fetch.
#[derive(Default)]
pub struct MockPrices {
    pub quotes: HashMap<String, (f64, f64)>,
    pub names: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl MockPrices {
    /// `(ticker, last, open)` triples.
    pub fn with(quotes: &[(&str, f64, f64)]) -> Self {
        Self {
            quotes: quotes
                .iter()
                .map(|(t, last, open)| (t.to_string(), (*last, *open)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn named(mut self, ticker: &str, name: &str) -> Self {
        self.names.insert(ticker.into(), name.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPrices {
    async fn get_observation(&self, ticker: &str) -> anyhow::Result<PriceObservation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (last, open) = self
            .quotes
            .get(ticker)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no quote for {ticker}"))?;
        Ok(PriceObservation::new(ticker, last, open))
    }

    async fn company_name(&self, ticker: &str) -> anyhow::Result<Option<String>> {
        Ok(self.names.get(ticker).cloned())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<AlertPayload>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn sent(&self) -> Vec<AlertPayload> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_alert(&self, payload: &AlertPayload) -> anyhow::Result<()> {
        self.sent.lock().await.push(payload.clone());
        if self.fail {
            anyhow::bail!("ntfy unreachable");
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryStore {
    pub state: Arc<Mutex<Option<AlertState>>>,
    pub saves: Arc<AtomicUsize>,
    pub fail_load: bool,
    pub fail_save: bool,
}

impl InMemoryStore {
    pub fn seeded(state: AlertState) -> Self {
        Self {
            state: Arc::new(Mutex::new(Some(state))),
            ..Default::default()
        }
    }

    pub async fn stored(&self) -> Option<AlertState> {
        self.state.lock().await.clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertStateStore for InMemoryStore {
    async fn load(&self) -> anyhow::Result<AlertState> {
        if self.fail_load {
            anyhow::bail!("state file corrupt");
        }
        Ok(self.state.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, state: &AlertState) -> anyhow::Result<()> {
        if self.fail_save {
            anyhow::bail!("disk full");
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().await = Some(state.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockNews {
    pub items: Vec<Headline>,
    pub queries: Mutex<Vec<NewsQuery>>,
    pub fail: bool,
}

#[async_trait]
impl NewsSource for MockNews {
    async fn headlines(&self, query: &NewsQuery) -> anyhow::Result<Vec<Headline>> {
        self.queries.lock().await.push(query.clone());
        if self.fail {
            anyhow::bail!("feed timeout");
        }
        Ok(self.items.iter().take(query.limit).cloned().collect())
    }
}

//! Outbound collaborators of the evaluation loop: push delivery and news lookup.

pub mod news;
pub mod ntfy;

use async_trait::async_trait;
use corelib::{AlertPayload, Headline};

pub use news::{GoogleNewsClient, NewsQuery};
pub use ntfy::NtfyNotifier;

/// Delivers a fired alert. Failures are reported, never retried here.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_alert(&self, payload: &AlertPayload) -> anyhow::Result<()>;
}

/// Recent headlines about one company.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, query: &NewsQuery) -> anyhow::Result<Vec<Headline>>;
}

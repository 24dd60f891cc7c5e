pub mod company;
pub mod yahoo;

use async_trait::async_trait;
use corelib::PriceObservation;

pub use company::{CompanyDirectory, CompanyMeta};
pub use yahoo::{YahooClient, YahooError};

/// Market-data provider seam used by the evaluation loop.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Today's session open and the latest traded price for `ticker`.
    async fn get_observation(&self, ticker: &str) -> anyhow::Result<PriceObservation>;

    /// Display name of the company behind `ticker`, if the provider knows it.
    async fn company_name(&self, _ticker: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

use serde::{Deserialize, Serialize};

use super::Ticker;

/// Latest traded price and today's session open for one ticker.
///
/// Produced fresh on every run by a price source; never persisted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceObservation {
    pub ticker: Ticker,
    pub last_price: f64,
    pub open_price: f64,
}

impl PriceObservation {
    pub fn new(ticker: impl Into<Ticker>, last_price: f64, open_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            last_price,
            open_price,
        }
    }
}

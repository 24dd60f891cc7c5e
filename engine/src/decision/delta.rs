use corelib::PriceObservation;
use thiserror::Error;

use super::types::{DeltaPct, TestOverrides};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaError {
    #[error("invalid observation for {ticker}: {reason}")]
    InvalidObservation { ticker: String, reason: String },
}

/// Percentage move of the last price relative to today's open.
///
/// A forced delta from active test overrides wins over the observation, even
/// one that would otherwise be rejected.
pub fn compute_delta(obs: &PriceObservation, test: &TestOverrides) -> Result<DeltaPct, DeltaError> {
    if let Some(forced) = test.forced_delta() {
        return Ok(forced);
    }

    // Prices are strictly positive; anything else is a bad quote.
    if !obs.open_price.is_finite() || obs.open_price <= 0.0 {
        return Err(DeltaError::InvalidObservation {
            ticker: obs.ticker.clone(),
            reason: format!("open price is {}", obs.open_price),
        });
    }

    if !obs.last_price.is_finite() || obs.last_price <= 0.0 {
        return Err(DeltaError::InvalidObservation {
            ticker: obs.ticker.clone(),
            reason: format!("last price is {}", obs.last_price),
        });
    }

    Ok((obs.last_price - obs.open_price) / obs.open_price * 100.0)
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertDirection, Ticker};

/// Persisted anti-spam state: ticker → last reported direction.
///
/// Serializes as a flat JSON object, e.g. `{"AAPL": "up", "SAP.DE": "none"}`.
/// Tickers without an entry are treated as [`AlertDirection::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AlertState(BTreeMap<Ticker, AlertDirection>);

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction_of(&self, ticker: &str) -> AlertDirection {
        self.0.get(ticker).copied().unwrap_or_default()
    }

    /// Record the direction for `ticker`, returning the previous one.
    pub fn set(&mut self, ticker: impl Into<Ticker>, direction: AlertDirection) -> AlertDirection {
        self.0.insert(ticker.into(), direction).unwrap_or_default()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.0.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &AlertDirection)> {
        self.0.iter()
    }
}

impl FromIterator<(Ticker, AlertDirection)> for AlertState {
    fn from_iter<I: IntoIterator<Item = (Ticker, AlertDirection)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A news item attached to an outgoing alert.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

/// Everything a notifier needs to render one alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload {
    pub ticker: Ticker,
    /// Always `Up` or `Down` for a fired alert.
    pub direction: AlertDirection,
    pub delta_pct: f64,
    pub last_price: f64,
    pub open_price: f64,
    pub headlines: Vec<Headline>,
}

impl AlertPayload {
    pub fn title(&self) -> String {
        format!("Stock Alert: {}", self.ticker)
    }

    /// Plain-text summary, prices and delta rounded to two decimals.
    pub fn summary(&self) -> String {
        let arrow = match self.direction {
            AlertDirection::Down => "📉",
            _ => "📈",
        };
        format!(
            "{} {}: {:+.2}% vs. open\nLast: {:.2} | Open: {:.2}",
            arrow, self.ticker, self.delta_pct, self.last_price, self.open_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ticker_defaults_to_none() {
        let state = AlertState::new();
        assert_eq!(state.direction_of("AAPL"), AlertDirection::None);
        assert!(!state.contains("AAPL"));
    }

    #[test]
    fn state_serializes_as_flat_object() {
        let mut state = AlertState::new();
        state.set("AAPL", AlertDirection::Up);
        state.set("SAP.DE", AlertDirection::None);

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"AAPL":"up","SAP.DE":"none"}"#);

        let back: AlertState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn set_returns_previous_direction() {
        let mut state = AlertState::new();
        assert_eq!(state.set("QQQ", AlertDirection::Down), AlertDirection::None);
        assert_eq!(state.set("QQQ", AlertDirection::Up), AlertDirection::Down);
    }

    #[test]
    fn summary_rounds_for_display() {
        let payload = AlertPayload {
            ticker: "AAPL".into(),
            direction: AlertDirection::Up,
            delta_pct: 3.551_724,
            last_price: 120.12,
            open_price: 116.0,
            headlines: vec![],
        };

        assert_eq!(payload.title(), "Stock Alert: AAPL");
        assert_eq!(
            payload.summary(),
            "📈 AAPL: +3.55% vs. open\nLast: 120.12 | Open: 116.00"
        );
    }
}

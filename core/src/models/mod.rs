use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod alert_models;
pub mod price_models;

pub use alert_models::*;
pub use price_models::*;

/// Symbol as the price provider expects it, e.g. `AAPL`, `SAP.DE`, `^GDAXI`.
pub type Ticker = String;

/// Which side of the corridor a ticker was last reported on.
///
/// `None` means the ticker is inside the corridor and may alert in either
/// direction on the next excursion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    #[default]
    None,
    Up,
    Down,
}

impl AlertDirection {
    pub fn is_none(&self) -> bool {
        matches!(self, AlertDirection::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::None => "none",
            AlertDirection::Up => "up",
            AlertDirection::Down => "down",
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AlertDirection::None),
            "up" => Ok(AlertDirection::Up),
            "down" => Ok(AlertDirection::Down),
            other => Err(anyhow::anyhow!("Invalid AlertDirection value: {}", other)),
        }
    }
}

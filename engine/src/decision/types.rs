use chrono_tz::Tz;

/// Signed percentage deviation of the last price from the session open.
pub type DeltaPct = f64;

/// Alert window in the exchange's local time.
///
/// Resolved once at startup; the timezone is already validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketWindowConfig {
    pub enabled: bool,
    pub timezone: Tz,
    /// Inclusive, local hour 0–23.
    pub start_hour: u32,
    /// Exclusive, local hour 1–24.
    pub end_hour: u32,
    pub weekdays_only: bool,
}

impl Default for MarketWindowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: chrono_tz::Europe::Berlin,
            start_hour: 8,
            end_hour: 22,
            weekdays_only: true,
        }
    }
}

/// Test-mode switches threaded through the decision functions.
///
/// `bypass_market_hours` and `force_delta_pct` only take effect while
/// `enabled` is set. `dry_run` is honoured on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestOverrides {
    pub enabled: bool,
    pub bypass_market_hours: bool,
    pub force_delta_pct: Option<f64>,
    pub dry_run: bool,
}

impl TestOverrides {
    pub fn bypasses_clock(&self) -> bool {
        self.enabled && self.bypass_market_hours
    }

    pub fn forced_delta(&self) -> Option<DeltaPct> {
        if self.enabled { self.force_delta_pct } else { None }
    }
}

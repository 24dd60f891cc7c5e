//! Shared types used by the evaluation loop.

use std::sync::Arc;

use adapters::NewsSource;
use common::RunId;
use corelib::{AlertDirection, AlertState, Ticker};
use engine::{DeltaPct, MarketWindowConfig, TestOverrides, WindowCheck};
use market::CompanyDirectory;

/// Static inputs of every run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Evaluated in this order.
    pub tickers: Vec<Ticker>,

    /// Positive magnitude; validated at config load.
    pub threshold_pct: f64,

    pub window: MarketWindowConfig,
    pub test: TestOverrides,
}

/// Optional headline lookup for fired alerts.
#[derive(Clone)]
pub struct NewsAttachment {
    pub source: Arc<dyn NewsSource>,
    pub companies: Arc<CompanyDirectory>,
    pub limit: usize,
    pub lookback_hours: u32,
}

/// What happened to the alert once it fired.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent,
    /// Dry run: logged, notifier not called.
    Logged,
    /// Notifier failed. The state transition stands.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    /// No alert. `direction` is the (unchanged or reset) state after the run.
    Quiet {
        delta: DeltaPct,
        direction: AlertDirection,
        reset: bool,
    },
    Fired {
        delta: DeltaPct,
        direction: AlertDirection,
        delivery: Delivery,
    },
    /// Observation missing or unusable; state untouched.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerReport {
    pub ticker: Ticker,
    pub outcome: TickerOutcome,
}

/// Summary of one run, mostly for logging and tests.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub window: WindowCheck,

    /// True when the window was closed and nothing was evaluated.
    pub gated: bool,

    pub tickers: Vec<TickerReport>,

    /// State as persisted at the end of the run. Empty when gated.
    pub state: AlertState,
}

impl RunReport {
    pub fn gated(run_id: RunId, window: WindowCheck) -> Self {
        Self {
            run_id,
            window,
            gated: true,
            tickers: Vec::new(),
            state: AlertState::new(),
        }
    }

    pub fn outcome_of(&self, ticker: &str) -> Option<&TickerOutcome> {
        self.tickers
            .iter()
            .find(|r| r.ticker == ticker)
            .map(|r| &r.outcome)
    }

    pub fn fired_count(&self) -> usize {
        self.tickers
            .iter()
            .filter(|r| matches!(r.outcome, TickerOutcome::Fired { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.tickers
            .iter()
            .filter(|r| matches!(r.outcome, TickerOutcome::Skipped { .. }))
            .count()
    }
}

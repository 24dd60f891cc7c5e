//! The evaluation loop.
//!
//! One run:
//!   1. Checks the alert window; outside of it (and not in test mode) the run
//!      ends without touching prices or state.
//!   2. Loads the alert state once.
//!   3. For each ticker in order: fetch the observation, compute the delta,
//!      consult the state machine, record the next direction and hand fired
//!      alerts to the notifier (or just log them on a dry run).
//!   4. Saves the state once. A failed save fails the run.
//!
//! Per-ticker problems never abort the run; they are logged and the ticker's
//! state is left as it was.

use std::sync::Arc;
use std::time::Duration;

use adapters::{NewsQuery, Notifier};
use chrono::{DateTime, Utc};
use common::{RunId, annotate_ticker, run_span, warn_if_slow};
use corelib::{AlertDirection, AlertPayload, AlertState, Headline, PriceObservation};
use engine::{DeltaPct, check_trading_window, compute_delta, evaluate};
use market::PriceSource;
use state::{AlertStateStore, load_or_empty};
use tracing::{Instrument, debug, error, info, warn};

use crate::types::{
    Delivery, NewsAttachment, RunConfig, RunReport, TickerOutcome, TickerReport,
};

const SLOW_FETCH: Duration = Duration::from_secs(5);
const SLOW_SAVE: Duration = Duration::from_millis(500);

pub struct EvaluationLoop {
    cfg: RunConfig,
    prices: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn AlertStateStore>,
    news: Option<NewsAttachment>,
}

impl EvaluationLoop {
    pub fn new(
        cfg: RunConfig,
        prices: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn AlertStateStore>,
    ) -> Self {
        Self {
            cfg,
            prices,
            notifier,
            store,
            news: None,
        }
    }

    /// Attach recent headlines to fired alerts.
    pub fn with_news(mut self, news: NewsAttachment) -> Self {
        self.news = Some(news);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Execute one run as of `now`, inside a fresh `run` span.
    pub async fn run_once(&self, now: DateTime<Utc>) -> anyhow::Result<RunReport> {
        let run_id = RunId::new();
        let span = run_span("evaluate", &run_id);

        self.run_inner(now, run_id).instrument(span).await
    }

    async fn run_inner(&self, now: DateTime<Utc>, run_id: RunId) -> anyhow::Result<RunReport> {
        let test = &self.cfg.test;
        let window = check_trading_window(now, &self.cfg.window, test);

        info!(
            tickers = self.cfg.tickers.len(),
            threshold = self.cfg.threshold_pct,
            window = ?window,
            test_mode = test.enabled,
            dry_run = test.dry_run,
            "run started"
        );

        if !test.enabled && !window.is_open() {
            info!(reason = ?window, "outside alert window; nothing evaluated");
            return Ok(RunReport::gated(run_id, window));
        }

        let mut state = load_or_empty(self.store.as_ref()).await;
        let mut tickers = Vec::with_capacity(self.cfg.tickers.len());

        for ticker in &self.cfg.tickers {
            annotate_ticker(ticker);
            let outcome = self.evaluate_ticker(ticker, &mut state).await;
            tickers.push(TickerReport {
                ticker: ticker.clone(),
                outcome,
            });
        }

        if let Err(e) = warn_if_slow("state_save", SLOW_SAVE, self.store.save(&state)).await {
            error!(error = %e, "failed to persist alert state");
            return Err(e.context("persist alert state"));
        }

        let report = RunReport {
            run_id,
            window,
            gated: false,
            tickers,
            state,
        };

        info!(
            fired = report.fired_count(),
            skipped = report.skipped_count(),
            "run finished"
        );
        Ok(report)
    }

    async fn evaluate_ticker(&self, ticker: &str, state: &mut AlertState) -> TickerOutcome {
        let obs = match warn_if_slow("price_fetch", SLOW_FETCH, self.prices.get_observation(ticker)).await {
            Ok(obs) => obs,
            Err(e) => {
                warn!(ticker, error = %e, "price fetch failed; ticker skipped");
                return TickerOutcome::Skipped {
                    reason: format!("price fetch failed: {e}"),
                };
            }
        };

        let delta = match compute_delta(&obs, &self.cfg.test) {
            Ok(d) => d,
            Err(e) => {
                warn!(ticker, error = %e, "unusable observation; ticker skipped");
                return TickerOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        if self.cfg.test.forced_delta().is_some() {
            info!(ticker, forced = delta, "test mode: forced delta in use");
        }

        let prev = state.direction_of(ticker);
        let decision = evaluate(ticker, delta, self.cfg.threshold_pct, prev);
        state.set(ticker, decision.next);

        info!(
            ticker,
            last = obs.last_price,
            open = obs.open_price,
            delta = %format!("{delta:+.2}"),
            threshold = self.cfg.threshold_pct,
            prev = %decision.prev,
            next = %decision.next,
            fire = decision.fire,
            "alert decision"
        );

        let Some(direction) = decision.fired_direction else {
            if decision.is_reset() {
                info!(ticker, prev = %decision.prev, "back inside corridor; re-armed");
            }
            return TickerOutcome::Quiet {
                delta,
                direction: decision.next,
                reset: decision.is_reset(),
            };
        };

        let headlines = self.headlines_for(ticker).await;
        let payload = self.build_payload(&obs, direction, delta, headlines);
        let delivery = self.deliver(&payload).await;

        TickerOutcome::Fired {
            delta,
            direction,
            delivery,
        }
    }

    fn build_payload(
        &self,
        obs: &PriceObservation,
        direction: AlertDirection,
        delta: DeltaPct,
        headlines: Vec<Headline>,
    ) -> AlertPayload {
        // A forced delta gets a matching synthetic last price.
        let last_price = if self.cfg.test.forced_delta().is_some() && obs.open_price > 0.0 {
            obs.open_price * (1.0 + delta / 100.0)
        } else {
            obs.last_price
        };

        AlertPayload {
            ticker: obs.ticker.clone(),
            direction,
            delta_pct: delta,
            last_price,
            open_price: obs.open_price,
            headlines,
        }
    }

    async fn headlines_for(&self, ticker: &str) -> Vec<Headline> {
        let Some(news) = &self.news else {
            return Vec::new();
        };

        let meta = news.companies.lookup(self.prices.as_ref(), ticker).await;
        let query = NewsQuery::new(meta.display_name(), news.limit, news.lookback_hours)
            .with_keywords(meta.keywords());

        match warn_if_slow("news_fetch", SLOW_FETCH, news.source.headlines(&query)).await {
            Ok(items) => {
                debug!(ticker, query = %query.query, count = items.len(), "headlines attached");
                items
            }
            Err(e) => {
                warn!(ticker, error = %e, "news lookup failed; alert sent without headlines");
                Vec::new()
            }
        }
    }

    async fn deliver(&self, payload: &AlertPayload) -> Delivery {
        if self.cfg.test.dry_run {
            info!(
                ticker = %payload.ticker,
                direction = %payload.direction,
                title = %payload.title(),
                message = %payload.summary(),
                headlines = payload.headlines.len(),
                "dry run: alert not sent"
            );
            return Delivery::Logged;
        }

        match self.notifier.send_alert(payload).await {
            Ok(()) => {
                info!(ticker = %payload.ticker, direction = %payload.direction, "alert sent");
                Delivery::Sent
            }
            Err(e) => {
                error!(ticker = %payload.ticker, error = %e, "alert delivery failed; state kept");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

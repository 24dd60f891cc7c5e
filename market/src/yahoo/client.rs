use std::time::Duration;

use async_trait::async_trait;
use corelib::PriceObservation;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::PriceSource;
use crate::yahoo::errors::YahooError;
use crate::yahoo::types::{ChartEnvelope, ChartResult};

/// Intraday candle sizes tried in order before falling back to the daily bar.
const INTRADAY_INTERVALS: [&str; 3] = ["1m", "5m", "15m"];
const ATTEMPTS_PER_INTERVAL: usize = 2;

/// Yahoo Finance chart API client.
#[derive(Clone)]
pub struct YahooClient {
    http: Client,
    base_url: String,
    retry_pause: Duration,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, YahooError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            // Yahoo rejects requests without a browser-like agent.
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) stock-alerts")
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            retry_pause: Duration::from_millis(400),
        })
    }

    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    fn chart_url(&self, ticker: &str) -> Result<Url, YahooError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| YahooError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| YahooError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_chart(&self, ticker: &str, interval: &str) -> Result<ChartResult, YahooError> {
        let url = self.chart_url(ticker)?;

        let resp = self
            .http
            .get(url)
            .query(&[("range", "1d"), ("interval", interval)])
            .send()
            .await?
            .error_for_status()?;

        let envelope: ChartEnvelope = resp.json().await?;

        if let Some(err) = envelope.chart.error {
            return Err(YahooError::Api {
                code: err.code,
                description: err.description,
            });
        }

        envelope
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
            .ok_or_else(|| YahooError::NoData(ticker.to_string()))
    }

    /// Today's open and latest close.
    ///
    /// Strategy:
    ///   1. Intraday candles (1m, 5m, 15m), two attempts each, since Yahoo
    ///      intermittently answers with an empty series.
    ///   2. Daily bar when no intraday data exists (e.g. market closed).
    ///
    /// HTTP and API errors abort immediately; only empty series are retried.
    pub async fn fetch_open_and_last(&self, ticker: &str) -> Result<(f64, f64), YahooError> {
        for interval in INTRADAY_INTERVALS {
            for attempt in 1..=ATTEMPTS_PER_INTERVAL {
                let chart = self.fetch_chart(ticker, interval).await?;

                if let Some((open, last)) = chart.open_and_last() {
                    debug!(ticker, interval, open, last, "intraday prices fetched");
                    return Ok((open, last));
                }

                debug!(ticker, interval, attempt, "empty intraday series");
                tokio::time::sleep(self.retry_pause).await;
            }
        }

        let daily = self.fetch_chart(ticker, "1d").await?;
        let (open, last) = daily
            .open_and_last()
            .ok_or_else(|| YahooError::NoData(ticker.to_string()))?;

        debug!(ticker, open, last, "fallback daily prices fetched");
        Ok((open, last))
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn get_observation(&self, ticker: &str) -> anyhow::Result<PriceObservation> {
        let (open, last) = self.fetch_open_and_last(ticker).await?;
        Ok(PriceObservation::new(ticker, last, open))
    }

    async fn company_name(&self, ticker: &str) -> anyhow::Result<Option<String>> {
        let chart = self.fetch_chart(ticker, "1d").await?;
        Ok(chart.company_name())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use corelib::Headline;
use reqwest::Client;
use rss::Channel;
use tracing::{debug, instrument};

use crate::NewsSource;
use crate::news::errors::NewsError;
use crate::news::parser::{NewsQuery, select_headlines};

/// Google News RSS search.
#[derive(Clone)]
pub struct GoogleNewsClient {
    http: Client,
    base_url: String,
    lang: String,
    country: String,
}

impl GoogleNewsClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://news.google.com/rss/search";

    pub fn new(
        base_url: impl Into<String>,
        lang: impl Into<String>,
        country: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            lang: lang.into(),
            country: country.into(),
        })
    }

    /// Query parameters: `q` carries the `when:` operator so Google already
    /// narrows the feed to the lookback window.
    fn params(&self, query: &NewsQuery) -> [(&'static str, String); 4] {
        [
            ("q", format!("{} when:{}h", query.query, query.lookback_hours)),
            ("hl", self.lang.clone()),
            ("gl", self.country.clone()),
            ("ceid", format!("{}:{}", self.country, self.lang)),
        ]
    }

    #[instrument(skip(self), fields(query = %query.query), level = "debug")]
    async fn fetch_channel(&self, query: &NewsQuery) -> Result<Channel, NewsError> {
        let bytes = self
            .http
            .get(&self.base_url)
            .query(&self.params(query))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(Channel::read_from(&bytes[..])?)
    }
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    async fn headlines(&self, query: &NewsQuery) -> anyhow::Result<Vec<Headline>> {
        let channel = self.fetch_channel(query).await?;
        let out = select_headlines(&channel, query, Utc::now());

        debug!(
            query = %query.query,
            items = channel.items().len(),
            selected = out.len(),
            "news feed filtered"
        );
        Ok(out)
    }
}

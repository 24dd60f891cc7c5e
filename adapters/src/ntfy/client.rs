use std::time::Duration;

use async_trait::async_trait;
use common::mask_secret;
use corelib::AlertPayload;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, info, instrument};

use crate::Notifier;
use crate::ntfy::errors::NtfyError;

/// Push delivery through an ntfy server (`POST {server}/{topic}`).
#[derive(Clone)]
pub struct NtfyNotifier {
    http: Client,
    server: String,
    topic: String,
}

impl NtfyNotifier {
    pub fn new(server: impl Into<String>, topic: impl Into<String>, timeout: Duration) -> Result<Self, NtfyError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            server: server.into(),
            topic: topic.into(),
        })
    }

    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.server.trim_end_matches('/'), self.topic)
    }

    fn headers(payload: &AlertPayload) -> Result<HeaderMap, NtfyError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "title",
            HeaderValue::from_str(&payload.title()).map_err(|_| NtfyError::InvalidHeader("Title"))?,
        );
        headers.insert("priority", HeaderValue::from_static("high"));

        if !payload.headlines.is_empty() {
            headers.insert("markdown", HeaderValue::from_static("yes"));
        }

        // Tapping the notification opens the first headline.
        if let Some(first) = payload.headlines.first() {
            headers.insert(
                "click",
                HeaderValue::from_str(&first.link).map_err(|_| NtfyError::InvalidHeader("Click"))?,
            );
        }

        Ok(headers)
    }

    #[instrument(skip(self, payload), fields(ticker = %payload.ticker), level = "debug")]
    async fn post(&self, payload: &AlertPayload) -> Result<(), NtfyError> {
        let headers = Self::headers(payload)?;

        info!(
            title = %payload.title(),
            topic = %mask_secret(&self.topic, 1),
            "sending ntfy notification"
        );

        let resp = self
            .http
            .post(self.topic_url())
            .headers(headers)
            .body(render_message(payload))
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %resp.status(), "ntfy accepted notification");
        Ok(())
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn send_alert(&self, payload: &AlertPayload) -> anyhow::Result<()> {
        self.post(payload).await?;
        Ok(())
    }
}

/// Notification body: the alert summary, followed by a markdown list of
/// headlines when any are attached.
pub fn render_message(payload: &AlertPayload) -> String {
    let mut msg = payload.summary();

    if !payload.headlines.is_empty() {
        msg.push_str("\n\n**News**");
        for h in &payload.headlines {
            if h.source.is_empty() {
                msg.push_str(&format!("\n- [{}]({})", h.title, h.link));
            } else {
                msg.push_str(&format!("\n- [{}]({}) ({})", h.title, h.link, h.source));
            }
        }
    }

    msg
}

//! Headline selection from a Google News RSS channel.
//!
//! Pure over the parsed channel and a reference time so the filtering rules
//! can be tested without a network.

use chrono::{DateTime, Duration, Utc};
use corelib::Headline;
use rss::{Channel, Item};

/// Minimum number of feed items inspected, whatever the limit.
const MIN_SCAN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsQuery {
    /// Free-text search term, usually the cleaned company name.
    pub query: String,

    /// Lowercased terms of which a title must contain at least one.
    /// Empty means no relevance filter.
    pub keywords: Vec<String>,

    pub limit: usize,
    pub lookback_hours: u32,
}

impl NewsQuery {
    pub fn new(query: impl Into<String>, limit: usize, lookback_hours: u32) -> Self {
        Self {
            query: query.into(),
            keywords: Vec::new(),
            limit,
            lookback_hours,
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    fn is_relevant(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let lower = title.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Pick up to `query.limit` headlines from `channel`.
///
/// Only the first `max(10, limit * 3)` items are inspected. Items without a
/// title or link are dropped, as are items published before the lookback
/// cutoff. Items without a parseable date are kept.
pub fn select_headlines(channel: &Channel, query: &NewsQuery, now: DateTime<Utc>) -> Vec<Headline> {
    if query.limit == 0 {
        return Vec::new();
    }

    let cutoff = now - Duration::hours(i64::from(query.lookback_hours));
    let scan = MIN_SCAN.max(query.limit.saturating_mul(3));

    let mut out = Vec::with_capacity(query.limit);
    for item in channel.items().iter().take(scan) {
        let Some(headline) = to_headline(item) else {
            continue;
        };

        if let Some(published) = headline.published {
            if published < cutoff {
                continue;
            }
        }

        if !query.is_relevant(&headline.title) {
            continue;
        }

        out.push(headline);
        if out.len() >= query.limit {
            break;
        }
    }

    out
}

fn to_headline(item: &Item) -> Option<Headline> {
    let title = item.title().map(str::trim).filter(|t| !t.is_empty())?;
    let link = item.link().map(str::trim).filter(|l| !l.is_empty())?;

    // Publisher from <source>, else the first category.
    let source = item
        .source()
        .and_then(|s| s.title())
        .or_else(|| item.categories().first().map(|c| c.name()))
        .unwrap_or_default()
        .trim()
        .to_string();

    let published = item
        .pub_date()
        .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
        .map(|d| d.with_timezone(&Utc));

    Some(Headline {
        title: title.to_string(),
        source,
        link: link.to_string(),
        published,
    })
}

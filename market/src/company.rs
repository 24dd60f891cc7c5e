//! Company metadata used to build news queries for a ticker.
//!
//! Names come from the price provider and are cached in memory and, when a
//! cache path is configured, in a JSON file so later runs skip the lookup.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::PriceSource;

/// Legal-form suffixes dropped from the end of a company name.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "co", "co.", "ltd", "ltd.", "plc", "ag", "se", "nv", "sa",
    "oyj", "ab", "spa", "s.p.a.", "pte", "pteltd",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompanyMeta {
    pub ticker: String,
    /// Cleaned name, e.g. `Apple` for `Apple Inc.`.
    pub name: Option<String>,
    pub raw_name: Option<String>,
    /// Where the name came from: `provider`, `base_ticker` or `cache`.
    pub source: String,
    pub base_ticker: String,
}

impl CompanyMeta {
    pub fn from_name(ticker: &str, raw_name: Option<String>) -> Self {
        let base = base_ticker(ticker);
        let clean = raw_name
            .as_deref()
            .map(strip_legal_suffixes)
            .filter(|s| !s.is_empty());

        match clean {
            Some(name) => Self {
                ticker: ticker.to_string(),
                name: Some(name),
                raw_name,
                source: "provider".into(),
                base_ticker: base,
            },
            None => Self {
                ticker: ticker.to_string(),
                name: Some(base.clone()),
                raw_name: Some(base.clone()),
                source: "base_ticker".into(),
                base_ticker: base,
            },
        }
    }

    /// Name used as the free-text news query.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.base_ticker)
    }

    /// Lowercased terms a headline should mention to count as relevant:
    /// first word of the name, the full ticker and the base ticker.
    pub fn keywords(&self) -> Vec<String> {
        let cleaned = self.display_name().replace([',', '.'], " ");
        let primary = cleaned
            .split_whitespace()
            .next()
            .unwrap_or(&self.base_ticker)
            .to_lowercase();

        let mut out = vec![
            primary,
            self.ticker.to_lowercase(),
            self.base_ticker.to_lowercase(),
        ];
        out.sort();
        out.dedup();
        out
    }
}

/// `Apple Inc.` → `Apple`, `SAP SE` → `SAP`.
pub fn strip_legal_suffixes(name: &str) -> String {
    let mut parts: Vec<&str> = name
        .split_whitespace()
        .map(|p| p.trim_matches(|c| c == ',' || c == '.' || c == ' '))
        .filter(|p| !p.is_empty())
        .collect();

    while let Some(last) = parts.last() {
        if LEGAL_SUFFIXES.contains(&last.to_lowercase().as_str()) {
            parts.pop();
        } else {
            break;
        }
    }

    if parts.is_empty() {
        name.trim().to_string()
    } else {
        parts.join(" ")
    }
}

/// `SAP.DE` → `SAP`, `BRK.B` → `BRK`. Index symbols (`^GDAXI`) stay as they are.
pub fn base_ticker(symbol: &str) -> String {
    if symbol.starts_with('^') {
        return symbol.to_string();
    }
    symbol.split('.').next().unwrap_or(symbol).to_string()
}

/// Ticker → company metadata, backed by an optional JSON cache file.
pub struct CompanyDirectory {
    cache_path: Option<PathBuf>,
    entries: Mutex<Option<HashMap<String, CompanyMeta>>>,
}

impl CompanyDirectory {
    pub fn new(cache_path: Option<PathBuf>) -> Self {
        Self {
            cache_path,
            entries: Mutex::new(None),
        }
    }

    /// Resolve metadata for `ticker`. Never fails: provider errors fall back
    /// to the base ticker.
    pub async fn lookup(&self, source: &dyn PriceSource, ticker: &str) -> CompanyMeta {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load_cache().await);
        }
        let entries = guard.get_or_insert_with(HashMap::new);

        if let Some(hit) = entries.get(ticker) {
            let mut meta = hit.clone();
            meta.source = "cache".into();
            return meta;
        }

        let raw_name = match source.company_name(ticker).await {
            Ok(name) => name,
            Err(e) => {
                warn!(ticker, error = %e, "company name lookup failed; using base ticker");
                None
            }
        };

        let meta = CompanyMeta::from_name(ticker, raw_name);
        debug!(ticker, name = ?meta.name, source = %meta.source, "company metadata resolved");

        entries.insert(ticker.to_string(), meta.clone());
        self.save_cache(entries).await;

        meta
    }

    async fn load_cache(&self) -> HashMap<String, CompanyMeta> {
        let Some(path) = &self.cache_path else {
            return HashMap::new();
        };

        match tokio::fs::read_to_string(path).await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "company cache unreadable; starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    async fn save_cache(&self, entries: &HashMap<String, CompanyMeta>) {
        let Some(path) = &self.cache_path else {
            return;
        };

        // Sorted for stable diffs of the cache file.
        let sorted: BTreeMap<_, _> = entries.iter().collect();
        let text = match serde_json::to_string_pretty(&sorted) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "company cache serialization failed");
                return;
            }
        };

        // Write beside the cache then rename, so readers never see a partial file.
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = tokio::fs::write(&tmp, text).await {
            warn!(path = %tmp.display(), error = %e, "company cache write failed");
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            warn!(path = %path.display(), error = %e, "company cache rename failed");
            let _ = tokio::fs::remove_file(&tmp).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_legal_forms() {
        assert_eq!(strip_legal_suffixes("Apple Inc."), "Apple");
        assert_eq!(strip_legal_suffixes("SAP SE"), "SAP");
        assert_eq!(strip_legal_suffixes("Siemens Healthineers AG"), "Siemens Healthineers");
        assert_eq!(strip_legal_suffixes("Acme Co., Ltd."), "Acme");
        assert_eq!(strip_legal_suffixes("Invesco QQQ Trust"), "Invesco QQQ Trust");
    }

    #[test]
    fn suffix_only_name_is_kept() {
        assert_eq!(strip_legal_suffixes("AG"), "AG");
    }

    #[test]
    fn base_ticker_drops_exchange_suffix() {
        assert_eq!(base_ticker("SAP.DE"), "SAP");
        assert_eq!(base_ticker("BRK.B"), "BRK");
        assert_eq!(base_ticker("AAPL"), "AAPL");
        assert_eq!(base_ticker("^GDAXI"), "^GDAXI");
    }

    #[test]
    fn keywords_cover_name_and_tickers() {
        let meta = CompanyMeta::from_name("AAPL", Some("Apple Inc.".into()));
        assert_eq!(meta.display_name(), "Apple");
        assert_eq!(meta.keywords(), vec!["aapl".to_string(), "apple".to_string()]);

        let sap = CompanyMeta::from_name("SAP.DE", Some("SAP SE".into()));
        assert_eq!(sap.keywords(), vec!["sap".to_string(), "sap.de".to_string()]);
    }

    #[test]
    fn missing_name_falls_back_to_base_ticker() {
        let meta = CompanyMeta::from_name("SAP.DE", None);
        assert_eq!(meta.name.as_deref(), Some("SAP"));
        assert_eq!(meta.source, "base_ticker");
    }
}

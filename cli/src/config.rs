//! Application configuration.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file, then
//! `LOG_LEVEL` / `NTFY_SERVER` / `NTFY_TOPIC` from the environment (a `.env`
//! file is loaded first), then command-line flags. Nested sections in the file
//! only need the keys they change; everything else keeps its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use common::{LogConfig, parse_level};
use engine::{MarketWindowConfig, TestOverrides};
use scheduler::RunConfig;
use serde::Deserialize;
use state::StateBackend;
use thiserror::Error;

/// Placeholder topic shipped in the defaults; must be replaced before sending.
pub const PLACEHOLDER_TOPIC: &str = "CHANGE-ME";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("threshold_pct must be a positive number, got {0}")]
    InvalidThreshold(f64),

    #[error("tickers must not be empty")]
    NoTickers,

    #[error("ntfy topic is not set (config ntfy.topic or NTFY_TOPIC)")]
    MissingTopic,

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("market hours must satisfy start_hour < end_hour <= 24, got {start}..{end}")]
    InvalidHours { start: u32, end: u32 },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("unknown log level '{0}' (expected trace, debug, info, warning, error or critical)")]
    InvalidLogLevel(String),

    #[error("forced delta must be a finite number, got {0}")]
    InvalidForcedDelta(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NtfyConfig {
    pub server: String,
    pub topic: String,
}

impl Default for NtfyConfig {
    fn default() -> Self {
        Self {
            server: "https://ntfy.sh".into(),
            topic: PLACEHOLDER_TOPIC.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketHoursConfig {
    pub enabled: bool,
    /// IANA name, e.g. `Europe/Berlin`.
    pub tz: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub days_mon_to_fri_only: bool,
}

impl Default for MarketHoursConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tz: "Europe/Berlin".into(),
            start_hour: 8,
            end_hour: 22,
            days_mon_to_fri_only: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub enabled: bool,
    pub bypass_market_hours: bool,
    pub force_delta_pct: Option<f64>,
    pub dry_run: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bypass_market_hours: true,
            force_delta_pct: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub enabled: bool,
    pub limit: usize,
    pub lookback_hours: u32,
    pub lang: String,
    pub country: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 2,
            lookback_hours: 12,
            lang: "de".into(),
            country: "DE".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub ntfy: NtfyConfig,
    pub tickers: Vec<String>,
    pub threshold_pct: f64,
    pub state_file: String,
    pub state_backend: StateBackend,
    /// Company-name cache used for news queries. No cache when unset.
    pub company_cache_file: Option<String>,
    pub market_hours: MarketHoursConfig,
    pub test: TestConfig,
    pub news: NewsConfig,
    pub http_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            ntfy: NtfyConfig::default(),
            tickers: vec!["AAPL".into()],
            threshold_pct: 3.0,
            state_file: "alert_state.json".into(),
            state_backend: StateBackend::Json,
            company_cache_file: None,
            market_hours: MarketHoursConfig::default(),
            test: TestConfig::default(),
            news: NewsConfig::default(),
            http_timeout_secs: 20,
            poll_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with `path` when it exists, then the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut cfg = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_json(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LOG_LEVEL") {
            self.log.level = v;
        }
        if let Some(v) = get("NTFY_SERVER") {
            self.ntfy.server = v;
        }
        if let Some(v) = get("NTFY_TOPIC") {
            self.ntfy.topic = v;
        }
    }

    /// `--dry-run` and `--force-delta`. A forced delta switches test mode on.
    pub fn apply_cli(&mut self, dry_run: bool, force_delta: Option<f64>) {
        if dry_run {
            self.test.dry_run = true;
        }
        if let Some(delta) = force_delta {
            self.test.enabled = true;
            self.test.force_delta_pct = Some(delta);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_pct.is_finite() || self.threshold_pct <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold_pct));
        }

        if self.tickers.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::NoTickers);
        }

        if parse_level(&self.log.level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.log.level.clone()));
        }

        if let Some(delta) = self.test.force_delta_pct.filter(|d| !d.is_finite()) {
            return Err(ConfigError::InvalidForcedDelta(delta));
        }

        let topic = self.ntfy.topic.trim();
        if !self.test.dry_run && (topic.is_empty() || topic == PLACEHOLDER_TOPIC) {
            return Err(ConfigError::MissingTopic);
        }

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("http_timeout_secs"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("poll_interval_secs"));
        }

        self.market_window().map(|_| ())
    }

    pub fn market_window(&self) -> Result<MarketWindowConfig, ConfigError> {
        let mh = &self.market_hours;

        let timezone: Tz = mh
            .tz
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(mh.tz.clone()))?;

        if mh.start_hour >= mh.end_hour || mh.end_hour > 24 {
            return Err(ConfigError::InvalidHours {
                start: mh.start_hour,
                end: mh.end_hour,
            });
        }

        Ok(MarketWindowConfig {
            enabled: mh.enabled,
            timezone,
            start_hour: mh.start_hour,
            end_hour: mh.end_hour,
            weekdays_only: mh.days_mon_to_fri_only,
        })
    }

    pub fn test_overrides(&self) -> TestOverrides {
        TestOverrides {
            enabled: self.test.enabled,
            bypass_market_hours: self.test.bypass_market_hours,
            force_delta_pct: self.test.force_delta_pct,
            dry_run: self.test.dry_run,
        }
    }

    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        Ok(RunConfig {
            tickers: self
                .tickers
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            threshold_pct: self.threshold_pct,
            window: self.market_window()?,
            test: self.test_overrides(),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

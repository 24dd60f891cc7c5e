use std::path::Path;

use anyhow::Context;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Logging section of the application config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is not set, e.g. `INFO`, `debug`,
    /// `WARNING`. See [`parse_level`].
    pub level: String,

    /// Emit JSON lines on the console instead of the human format.
    pub json: bool,

    /// Also write to a daily-rotated file.
    pub to_file: bool,

    /// Log file location. The file name becomes the rotation prefix.
    pub file_path: String,

    /// Number of rotated files kept on disk.
    pub file_backup_count: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".into(),
            json: false,
            to_file: false,
            file_path: "alerts.log".into(),
            file_backup_count: 3,
        }
    }
}

/// Install the global subscriber once.
///
/// The returned guard flushes the file writer on drop and must be held by
/// `main` for the lifetime of the process. Calling this twice is a no-op.
pub fn init_logger(service_name: &'static str, cfg: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    if LOGGER_INIT.get().is_some() {
        return Ok(None);
    }

    let level = parse_level(&cfg.level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level_filter(level))
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        // Includes timing when the run span closes
        .with_span_events(fmt::format::FmtSpan::CLOSE);

    if cfg.json {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    let mut guard = None;
    let mut file_dir = None;
    if cfg.to_file {
        let (appender, dir) = file_appender(cfg)?;
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);

        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        );

        file_dir = Some(dir);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("global subscriber already set")?;

    let _ = LOGGER_INIT.set(());

    tracing::info!(
        service = service_name,
        level = %cfg.level,
        to_file = cfg.to_file,
        "logger initialized"
    );
    if level.is_none() {
        tracing::warn!(level = %cfg.level, "unknown log level; using info");
    }
    if let Some(dir) = file_dir {
        tracing::debug!(dir = %dir, "file logging enabled");
    }

    Ok(guard)
}

/// Level name to filter, case-insensitive. Besides the `tracing` names this
/// accepts `warning`, and `critical`/`fatal` as `error`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "critical" | "fatal" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Global filter for a configured level; unknown names mean `info`.
fn level_filter(level: Option<LevelFilter>) -> EnvFilter {
    EnvFilter::new(level.unwrap_or(LevelFilter::INFO).to_string())
}

fn file_appender(cfg: &LogConfig) -> anyhow::Result<(RollingFileAppender, String)> {
    let path = Path::new(&cfg.file_path);

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("alerts.log");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(cfg.file_backup_count.max(1))
        .build(&dir)
        .context("build rolling file appender")?;

    Ok((appender, dir.display().to_string()))
}

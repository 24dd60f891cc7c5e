pub mod cli;
pub mod config;

use std::path::PathBuf;
use std::sync::Arc;

use adapters::{GoogleNewsClient, NewsSource, NtfyNotifier};
use chrono::Utc;
use clap::Parser;
use common::{init_logger, mask_secret};
use market::{CompanyDirectory, YahooClient};
use scheduler::{EvaluationLoop, NewsAttachment, run_periodically};
use tracing::{error, info, warn};

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(&cli.config)?;
    cfg.apply_cli(cli.dry_run, cli.force_delta);
    cfg.validate()?;

    // Held until exit so buffered file logs are flushed.
    let _log_guard = init_logger("stock-alerts", &cfg.log)?;

    log_effective_config(&cfg, &cli);

    let evaluator = build_evaluator(&cfg).await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = evaluator.run_once(Utc::now()).await?;
            if report.gated {
                info!(reason = ?report.window, "run skipped");
            }
        }
        Command::Watch { every } => {
            let every = every
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| cfg.poll_interval());
            run_periodically(&evaluator, every, shutdown_signal()).await;
        }
    }

    Ok(())
}

async fn build_evaluator(cfg: &AppConfig) -> anyhow::Result<EvaluationLoop> {
    let timeout = cfg.http_timeout();

    let prices = Arc::new(YahooClient::new(YahooClient::DEFAULT_BASE_URL, timeout)?);
    let notifier = Arc::new(NtfyNotifier::new(&cfg.ntfy.server, &cfg.ntfy.topic, timeout)?);
    let store = state::open_store(cfg.state_backend, &cfg.state_file).await?;

    let evaluator = EvaluationLoop::new(cfg.run_config()?, prices, notifier, store);

    if !cfg.news.enabled {
        return Ok(evaluator);
    }

    let source: Arc<dyn NewsSource> = Arc::new(GoogleNewsClient::new(
        GoogleNewsClient::DEFAULT_BASE_URL,
        &cfg.news.lang,
        &cfg.news.country,
        timeout,
    )?);
    let companies = CompanyDirectory::new(cfg.company_cache_file.as_ref().map(PathBuf::from));

    Ok(evaluator.with_news(NewsAttachment {
        source,
        companies: Arc::new(companies),
        limit: cfg.news.limit,
        lookback_hours: cfg.news.lookback_hours,
    }))
}

fn log_effective_config(cfg: &AppConfig, cli: &Cli) {
    if !cli.config.exists() {
        warn!(path = %cli.config.display(), "config file not found; using defaults");
    }

    info!(
        config = %cli.config.display(),
        ntfy_server = %cfg.ntfy.server,
        ntfy_topic = %mask_secret(&cfg.ntfy.topic, 1),
        log_level = %cfg.log.level,
        tickers = ?cfg.tickers,
        threshold_pct = cfg.threshold_pct,
        state_backend = %cfg.state_backend,
        state_file = %cfg.state_file,
        timezone = %cfg.market_hours.tz,
        hours = %format!("{}-{}", cfg.market_hours.start_hour, cfg.market_hours.end_hour),
        test_mode = cfg.test.enabled,
        dry_run = cfg.test.dry_run,
        news = cfg.news.enabled,
        "configuration loaded"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl-C; stop the process to exit");
        std::future::pending::<()>().await;
    }
}

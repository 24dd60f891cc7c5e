use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stock-alerts", version)]
#[command(about = "Push alerts when a stock moves too far from today's open")]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json", global = true)]
    pub config: PathBuf,

    /// Log alerts instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use this delta (percent) for every ticker; switches test mode on
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub force_delta: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Evaluate all tickers once (default)
    Run,

    /// Evaluate periodically until Ctrl-C
    Watch {
        /// Seconds between runs; defaults to poll_interval_secs
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        every: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_single_run() {
        let cli = Cli::try_parse_from(["stock-alerts"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn watch_with_global_flags() {
        let cli = Cli::try_parse_from([
            "stock-alerts",
            "watch",
            "--every",
            "60",
            "--config",
            "/etc/alerts.json",
            "--force-delta",
            "-3.5",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Command::Watch { every: Some(60) }));
        assert_eq!(cli.config, PathBuf::from("/etc/alerts.json"));
        assert_eq!(cli.force_delta, Some(-3.5));
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(Cli::try_parse_from(["stock-alerts", "watch", "--every", "0"]).is_err());
    }
}

use std::time::Duration;

use tracing::{Span, field};

use super::RunId;

/// Root span for one evaluation run. `ticker` is recorded per ticker while
/// the run walks its list.
pub fn run_span(name: &'static str, run_id: &RunId) -> Span {
    tracing::info_span!(
        "run",
        name = %name,
        run_id = %run_id,
        ticker = field::Empty
    )
}

pub fn annotate_ticker(ticker: &str) {
    Span::current().record("ticker", field::display(ticker));
}

/// Await `fut` and warn when it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = std::time::Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
